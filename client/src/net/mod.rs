//! Networking modules for the REST API and the room channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `socket` manages the websocket lifecycle on top
//! of the `connection` state machine and a `transport` connector, and `types`
//! defines the backend wire schema.

pub mod api;
pub mod connection;
pub mod socket;
pub mod transport;
pub mod types;
