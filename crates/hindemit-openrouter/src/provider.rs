use std::future::Future;
use std::pin::Pin;

use futures::Stream;

use hindemit_core::models::message::Message;

use crate::error::ProviderError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Stream of reply text fragments.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// A hosted model provider.
///
/// Implemented by [`OpenRouter`](crate::client::OpenRouter). The HTTP
/// service only talks to this trait, so tests can plug in a scripted
/// provider.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ChatProvider: Send + Sync {
    /// Start a streamed completion.
    fn stream_chat<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<DeltaStream, ProviderError>>;

    /// Run a completion to the end and return its text.
    fn generate_text<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}
