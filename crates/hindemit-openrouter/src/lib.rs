//! hindemit-openrouter
//!
//! Chat completion calls against OpenRouter's OpenAI-compatible API:
//! streamed replies for the chat, one-shot text for follow-up suggestions.

pub mod client;
pub mod error;
pub mod provider;
pub mod stream;
pub mod suggestions;
pub mod wire;
