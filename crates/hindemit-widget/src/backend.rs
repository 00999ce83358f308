use std::future::Future;
use std::pin::Pin;

use futures::Stream;

use hindemit_core::models::api::{ChatStreamEvent, ConversationRequest};

use crate::error::WidgetError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Decoded events of one chat reply.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, WidgetError>> + Send>>;

/// The endpoints the widget talks to.
///
/// [`HttpBackend`](crate::http::HttpBackend) is the real implementation;
/// methods return boxed futures for dyn compatibility.
pub trait ChatBackend: Send + Sync + 'static {
    /// `POST /api/chat`.
    fn stream_chat(
        &self,
        request: ConversationRequest,
    ) -> BoxFuture<'_, Result<EventStream, WidgetError>>;

    /// `POST /api/suggestions`.
    fn fetch_suggestions(
        &self,
        request: ConversationRequest,
    ) -> BoxFuture<'_, Result<Vec<String>, WidgetError>>;

    /// `GET /api/initial-suggestions`.
    fn initial_suggestions(&self) -> BoxFuture<'_, Result<Vec<String>, WidgetError>>;
}
