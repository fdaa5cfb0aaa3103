//! Transport seam between `ChatSocket` and the actual WebSocket.
//!
//! A [`Connector`] opens one channel and hands back a [`Transport`]: a pair of
//! unbounded queues. Dropping the `Transport` closes the channel.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::socket::SocketError;

/// Close code reported when the channel drops without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;
/// Close code reported for a close frame without a status.
pub const CLOSE_NO_STATUS: u16 = 1005;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text(String),
    Closed { code: u16, reason: String },
}

#[derive(Debug)]
pub struct Transport {
    /// Text frames to write to the channel.
    pub outbound: mpsc::UnboundedSender<String>,
    /// Frames read from the channel. Ends after `Closed`, or without it when
    /// the channel dies abnormally.
    pub inbound: mpsc::UnboundedReceiver<TransportEvent>,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, url: &str) -> Result<Transport, SocketError>;
}

/// [`Connector`] backed by `tokio-tungstenite`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn open(&self, url: &str) -> Result<Transport, SocketError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| SocketError::Connect(Box::new(error)))?;
        let (mut sink, mut source) = stream.split();

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel::<TransportEvent>();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    outgoing = outbound_rx.recv() => {
                        let Some(text) = outgoing else {
                            // Socket dropped the transport.
                            let _ = sink.send(Message::Close(None)).await;
                            break;
                        };
                        if let Err(error) = sink.send(Message::Text(text.into())).await {
                            let _ = inbound_tx.send(TransportEvent::Closed {
                                code: CLOSE_ABNORMAL,
                                reason: error.to_string(),
                            });
                            break;
                        }
                    }
                    incoming = source.next() => match incoming {
                        Some(Ok(Message::Text(text))) => {
                            if inbound_tx.send(TransportEvent::Text(text.as_str().to_owned())).is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame.map_or((CLOSE_NO_STATUS, String::new()), |f| {
                                (u16::from(f.code), f.reason.as_str().to_owned())
                            });
                            let _ = inbound_tx.send(TransportEvent::Closed { code, reason });
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(error)) => {
                            let _ = inbound_tx.send(TransportEvent::Closed {
                                code: CLOSE_ABNORMAL,
                                reason: error.to_string(),
                            });
                            break;
                        }
                        None => break,
                    }
                }
            }
            tracing::debug!("websocket pump finished");
        });

        Ok(Transport { outbound, inbound })
    }
}
