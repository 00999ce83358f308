//! hindemit-core
//!
//! Pure domain types for the Hindemit chat widget: messages, the model
//! catalog, suggestion parsing, SSE framing, and the chat session state
//! machine. No network and no async runtime. This is the shared vocabulary
//! of the server and the widget.

pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod suggestions;
