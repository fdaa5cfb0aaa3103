//! Reconnecting WebSocket client for a single chat room.
//!
//! DESIGN
//! ======
//! `ChatSocket` owns one logical connection. A `ConnectionMachine` decides
//! what happens on every open/close; this module only carries out the
//! effects: spawning the session task, starting the retry timer, tearing both
//! down. All bookkeeping sits behind one mutex whose critical sections never
//! await, so transitions are applied one at a time.
//!
//! Each `connect`/`disconnect` bumps a generation counter. Session and timer
//! tasks carry the generation they were started for and do nothing once it
//! is stale, so a replaced connection can never feed events into the new one.
//!
//! When a token is set, every freshly opened channel (retries included) is
//! sent an `auth` frame before any caller payload; the room only delivers
//! broadcasts to authenticated members.
//!
//! Inbound frames and status changes are delivered on the event channel
//! returned by [`ChatSocket::new`].

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::sync::{Arc, Mutex, MutexGuard};

use frames::ChatFrame;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::connection::{ConnectionMachine, ConnectionState, Effect, SocketInput};
use super::transport::{CLOSE_ABNORMAL, Connector, Transport, TransportEvent, TungsteniteConnector};
use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket is not connected")]
    NotConnected,
    #[error("payload encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Notification emitted to the registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Opened { room_id: String },
    Frame(ChatFrame),
    Error(String),
    Closed { code: u16, reason: String },
    Retrying { attempt: u32, max_attempts: u32 },
    Exhausted { attempts: u32 },
}

#[derive(Debug, Clone)]
struct RoomTarget {
    room_id: String,
    token: Option<String>,
}

/// Build the channel URL for a room: `{base}/{room_id}` plus `?token=` when a
/// credential is present.
#[must_use]
pub fn room_url(ws_base_url: &str, room_id: &str, token: Option<&str>) -> String {
    let base = ws_base_url.trim_end_matches('/');
    let room = urlencoding::encode(room_id);
    match token {
        Some(token) => format!("{base}/{room}?token={}", urlencoding::encode(token)),
        None => format!("{base}/{room}"),
    }
}

pub struct ChatSocket {
    shared: Arc<Shared>,
}

struct Shared {
    ws_base_url: String,
    connector: Arc<dyn Connector>,
    events: mpsc::UnboundedSender<SocketEvent>,
    inner: Mutex<Inner>,
}

struct Inner {
    machine: ConnectionMachine,
    target: Option<RoomTarget>,
    generation: u64,
    outbound: Option<mpsc::UnboundedSender<String>>,
    session: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
}

impl Inner {
    fn teardown(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
        if let Some(session) = self.session.take() {
            session.abort();
        }
        self.outbound = None;
    }
}

impl ChatSocket {
    /// Create a socket that opens real WebSocket connections.
    #[must_use]
    pub fn new(config: &ClientConfig) -> (Self, mpsc::UnboundedReceiver<SocketEvent>) {
        Self::with_connector(config, Arc::new(TungsteniteConnector))
    }

    #[must_use]
    pub fn with_connector(
        config: &ClientConfig,
        connector: Arc<dyn Connector>,
    ) -> (Self, mpsc::UnboundedReceiver<SocketEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            ws_base_url: config.ws_base_url.clone(),
            connector,
            events,
            inner: Mutex::new(Inner {
                machine: ConnectionMachine::new(config.reconnect),
                target: None,
                generation: 0,
                outbound: None,
                session: None,
                retry: None,
            }),
        });
        (Self { shared }, events_rx)
    }

    /// Open the channel for `room_id`, replacing any existing connection.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self, room_id: &str, token: Option<&str>) {
        let mut inner = self.shared.lock();
        inner.teardown();
        inner.generation += 1;
        inner.target = Some(RoomTarget { room_id: room_id.to_owned(), token: token.map(ToOwned::to_owned) });

        if inner.machine.step(SocketInput::Connect) == Effect::Open {
            tracing::info!(%room_id, "connecting chat socket");
            let generation = inner.generation;
            inner.session = Some(tokio::spawn(Arc::clone(&self.shared).run_session(generation)));
        }
    }

    /// JSON-encode `payload` and write it to the open channel.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::NotConnected`] if the channel is not open; the
    /// payload is dropped, not queued.
    pub fn send<T: Serialize>(&self, payload: &T) -> Result<(), SocketError> {
        let json = serde_json::to_string(payload)?;
        let inner = self.shared.lock();
        let state = inner.machine.state();
        let delivered = match inner.outbound.as_ref() {
            Some(tx) if state == ConnectionState::Open => tx.send(json).is_ok(),
            _ => false,
        };

        if delivered {
            Ok(())
        } else {
            tracing::error!(state = ?state, "chat socket is not connected");
            Err(SocketError::NotConnected)
        }
    }

    /// Close the channel, forget the room, and cancel any pending retry.
    pub fn disconnect(&self) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.teardown();
        inner.target = None;
        if inner.machine.step(SocketInput::Disconnect) == Effect::CancelRetry {
            tracing::info!("chat socket disconnected");
        }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.lock().machine.state()
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.shared.lock().machine.attempts()
    }

    #[must_use]
    pub fn room_id(&self) -> Option<String> {
        self.shared.lock().target.as_ref().map(|t| t.room_id.clone())
    }
}

impl Drop for ChatSocket {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.teardown();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, event: SocketEvent) {
        // Receiver gone means nobody is listening; that is not an error.
        let _ = self.events.send(event);
    }

    fn current_target(&self, generation: u64) -> Option<RoomTarget> {
        let inner = self.lock();
        if inner.generation == generation { inner.target.clone() } else { None }
    }

    async fn run_session(self: Arc<Self>, generation: u64) {
        let Some(target) = self.current_target(generation) else {
            return;
        };
        let url = room_url(&self.ws_base_url, &target.room_id, target.token.as_deref());

        let transport = match self.connector.open(&url).await {
            Ok(transport) => transport,
            Err(error) => {
                tracing::warn!(room_id = %target.room_id, %error, "chat socket failed to open");
                self.emit(SocketEvent::Error(error.to_string()));
                self.handle_close(generation, CLOSE_ABNORMAL, String::new());
                return;
            }
        };

        let Transport { outbound, mut inbound } = transport;
        if let Some(token) = &target.token {
            // Queued ahead of anything `send` can write.
            match frames::encode_frame(&ChatFrame::auth(token.as_str())) {
                Ok(auth) => {
                    let _ = outbound.send(auth);
                }
                Err(error) => tracing::warn!(%error, "auth frame encode failed"),
            }
        }
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                return;
            }
            inner.machine.step(SocketInput::Opened);
            inner.outbound = Some(outbound);
        }
        tracing::info!(room_id = %target.room_id, "chat socket connected");
        self.emit(SocketEvent::Opened { room_id: target.room_id.clone() });

        let (code, reason) = loop {
            match inbound.recv().await {
                Some(TransportEvent::Text(text)) => match frames::decode_frame(&text) {
                    Ok(frame) => self.emit(SocketEvent::Frame(frame)),
                    Err(error) => tracing::warn!(%error, "dropping unparseable chat frame"),
                },
                Some(TransportEvent::Closed { code, reason }) => break (code, reason),
                None => break (CLOSE_ABNORMAL, String::new()),
            }
        };
        self.handle_close(generation, code, reason);
    }

    fn handle_close(self: &Arc<Self>, generation: u64, code: u16, reason: String) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        inner.outbound = None;
        inner.session = None;
        tracing::info!(code, %reason, "chat socket closed");
        self.emit(SocketEvent::Closed { code, reason });

        let max_attempts = inner.machine.policy().max_attempts;
        match inner.machine.step(SocketInput::Closed) {
            Effect::ScheduleRetry { attempt, delay } => {
                tracing::info!(attempt, max_attempts, "reconnecting chat socket");
                self.emit(SocketEvent::Retrying { attempt, max_attempts });
                let shared = Arc::clone(self);
                inner.retry = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.retry_due(generation);
                }));
            }
            Effect::Exhausted { attempts } => {
                tracing::error!(attempts, "max reconnection attempts reached");
                self.emit(SocketEvent::Exhausted { attempts });
            }
            Effect::None | Effect::Open | Effect::CancelRetry => {}
        }
    }

    fn retry_due(self: &Arc<Self>, generation: u64) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        // This runs on the timer task itself; detach rather than abort it.
        inner.retry = None;
        if inner.machine.step(SocketInput::RetryDue) == Effect::Open {
            inner.session = Some(tokio::spawn(Arc::clone(self).run_session(generation)));
        }
    }
}
