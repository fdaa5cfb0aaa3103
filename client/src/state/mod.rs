//! Client-side presentation state.
//!
//! DESIGN
//! ======
//! Split by concern so the view and the CLI can depend on small models:
//! `chat` owns the feed and draft, `sidebar` the room/contact lists, and
//! `page` composes both with the socket's connection status.

pub mod chat;
pub mod page;
pub mod sidebar;
