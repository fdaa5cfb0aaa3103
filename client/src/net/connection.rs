//! Reconnect state machine for the chat socket.
//!
//! DESIGN
//! ======
//! The machine is pure: it takes an input, updates its state and attempt
//! counter, and returns the effect the driver in `socket.rs` must carry out.
//! Keeping timers and I/O out of here lets every transition be tested
//! synchronously.
//!
//! TRANSITIONS
//! ===========
//! | state               | input                   | next                       | effect          |
//! |---------------------|-------------------------|----------------------------|-----------------|
//! | any                 | `Connect`               | `Connecting`, attempts = 0 | `Open`          |
//! | `Connecting`        | `Opened`                | `Open`, attempts = 0       | none            |
//! | `Connecting`/`Open` | `Closed`, under ceiling | `Retrying(n + 1)`          | `ScheduleRetry` |
//! | `Connecting`/`Open` | `Closed`, at ceiling    | `Closed`                   | `Exhausted`     |
//! | `Retrying(n)`       | `RetryDue`              | `Connecting`               | `Open`          |
//! | any                 | `Disconnect`            | `Closed`, attempts = 0     | `CancelRetry`   |
//!
//! Every other pair leaves the machine untouched and yields no effect.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::time::Duration;

use crate::config::ReconnectPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Never connected.
    #[default]
    Idle,
    /// Waiting for the channel to open.
    Connecting,
    /// Channel is live.
    Open,
    /// Waiting out the delay before retry number `n`.
    Retrying(u32),
    /// Explicitly disconnected, or retries exhausted.
    Closed,
}

impl ConnectionState {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Idle => "idle".to_owned(),
            Self::Connecting => "connecting".to_owned(),
            Self::Open => "connected".to_owned(),
            Self::Retrying(n) => format!("reconnecting ({n})"),
            Self::Closed => "disconnected".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketInput {
    Connect,
    Opened,
    Closed,
    RetryDue,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start opening the channel for the stored target.
    Open,
    /// Start the retry timer.
    ScheduleRetry { attempt: u32, delay: Duration },
    /// Abort any pending retry timer and drop the live channel.
    CancelRetry,
    /// Give up; the ceiling was reached.
    Exhausted { attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    attempts: u32,
    policy: ReconnectPolicy,
}

impl ConnectionMachine {
    #[must_use]
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { state: ConnectionState::Idle, attempts: 0, policy }
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Consecutive automatic retries since the last successful open or
    /// explicit `Connect`.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    pub fn step(&mut self, input: SocketInput) -> Effect {
        use ConnectionState as S;

        match (self.state, input) {
            (_, SocketInput::Connect) => {
                self.state = S::Connecting;
                self.attempts = 0;
                Effect::Open
            }
            (S::Connecting, SocketInput::Opened) => {
                self.state = S::Open;
                self.attempts = 0;
                Effect::None
            }
            (S::Connecting | S::Open, SocketInput::Closed) => {
                if self.attempts < self.policy.max_attempts {
                    self.attempts += 1;
                    self.state = S::Retrying(self.attempts);
                    Effect::ScheduleRetry { attempt: self.attempts, delay: self.policy.interval }
                } else {
                    self.state = S::Closed;
                    Effect::Exhausted { attempts: self.attempts }
                }
            }
            (S::Retrying(_), SocketInput::RetryDue) => {
                self.state = S::Connecting;
                Effect::Open
            }
            (_, SocketInput::Disconnect) => {
                self.state = S::Closed;
                self.attempts = 0;
                Effect::CancelRetry
            }
            _ => Effect::None,
        }
    }
}
