//! Plain-text rendering of the chat page for terminal front ends.

mod render;

pub use render::{render_conversation, render_message, render_page, render_sidebar, time_label};
