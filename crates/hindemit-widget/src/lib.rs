//! hindemit-widget
//!
//! Client side of the chat widget: a controller that drives a
//! [`ChatSession`](hindemit_core::session::ChatSession) against the
//! Hindemit HTTP endpoints, streaming replies and fetching follow-up
//! suggestions after a short debounce.

pub mod backend;
pub mod controller;
pub mod error;
pub mod http;

pub use backend::ChatBackend;
pub use controller::{ChatController, SUGGESTION_DEBOUNCE};
pub use http::HttpBackend;
