//! [`ChatBackend`] over HTTP against a running Hindemit server.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use hindemit_core::models::api::{ChatStreamEvent, ConversationRequest, SuggestionsResponse};
use hindemit_core::sse::SseDecoder;

use crate::backend::{BoxFuture, ChatBackend, EventStream};
use crate::error::WidgetError;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ReqwestClient,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, WidgetError> {
        let client = ReqwestClient::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: ReqwestClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn chat(&self, request: ConversationRequest) -> Result<EventStream, WidgetError> {
        debug!(messages = request.messages.len(), "opening chat stream");
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(Box::pin(event_stream(response.bytes_stream())))
    }

    async fn suggestions(&self, request: ConversationRequest) -> Result<Vec<String>, WidgetError> {
        let response = self
            .client
            .post(self.url("/api/suggestions"))
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            // Missing key: 500 with an empty list.
            warn!(status = response.status().as_u16(), "suggestions request refused");
            return Ok(Vec::new());
        }
        let body: SuggestionsResponse = response.json().await?;
        Ok(body.suggestions)
    }

    async fn initial(&self) -> Result<Vec<String>, WidgetError> {
        let response = self
            .client
            .get(self.url("/api/initial-suggestions"))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: SuggestionsResponse = response.json().await?;
        Ok(body.suggestions)
    }
}

impl ChatBackend for HttpBackend {
    fn stream_chat(
        &self,
        request: ConversationRequest,
    ) -> BoxFuture<'_, Result<EventStream, WidgetError>> {
        Box::pin(self.chat(request))
    }

    fn fetch_suggestions(
        &self,
        request: ConversationRequest,
    ) -> BoxFuture<'_, Result<Vec<String>, WidgetError>> {
        Box::pin(self.suggestions(request))
    }

    fn initial_suggestions(&self) -> BoxFuture<'_, Result<Vec<String>, WidgetError>> {
        Box::pin(self.initial())
    }
}

async fn ensure_success(response: Response) -> Result<Response, WidgetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);
    Err(WidgetError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Decode the `/api/chat` event stream.
///
/// Frames with unknown event names are skipped. The stream ends after a
/// `finish` or `error` event, or when the body ends.
pub fn event_stream<S, E>(byte_stream: S) -> impl Stream<Item = Result<ChatStreamEvent, WidgetError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<WidgetError>,
{
    struct State<S> {
        bytes: Pin<Box<S>>,
        decoder: SseDecoder,
        done: bool,
    }

    let state = State {
        bytes: Box::pin(byte_stream),
        decoder: SseDecoder::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }

            let frame = match state.decoder.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => match state.bytes.next().await {
                    Some(Ok(chunk)) => {
                        state.decoder.push(&chunk);
                        continue;
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((Err(e.into()), state));
                    }
                    None => {
                        state.done = true;
                        match state.decoder.finish() {
                            Ok(Some(frame)) => frame,
                            Ok(None) => return None,
                            Err(e) => return Some((Err(e.into()), state)),
                        }
                    }
                },
                Err(e) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
            };

            match ChatStreamEvent::from_frame(&frame) {
                Ok(Some(event)) => {
                    if matches!(event, ChatStreamEvent::Finish | ChatStreamEvent::Error { .. }) {
                        state.done = true;
                    }
                    return Some((Ok(event), state));
                }
                Ok(None) => continue,
                Err(e) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
            }
        }
    })
}
