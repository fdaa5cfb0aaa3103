//! # client
//!
//! Client library for the room-based chat backend: typed REST calls, a
//! reconnecting per-room WebSocket, and the in-memory state behind the chat
//! page. `view` renders that state as plain text for terminal front ends.

pub mod config;
pub mod net;
pub mod state;
pub mod view;
