#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use futures::stream;
use tower::ServiceExt;

use hindemit_core::models::message::Message;
use hindemit_openrouter::error::ProviderError;
use hindemit_openrouter::provider::{BoxFuture, ChatProvider, DeltaStream};
use hindemit_server::state::AppState;

/// A recorded provider call: (model, system prompt, messages).
pub type Call = (String, String, Vec<Message>);

/// Provider with canned replies.
#[derive(Default)]
pub struct Scripted {
    /// Deltas for `stream_chat`; `Err` entries become stream errors.
    pub deltas: Vec<Result<String, String>>,
    /// Reply for `generate_text`; `Err` is an upstream status.
    pub reply: Option<Result<String, u16>>,
    /// Fail `stream_chat` before the stream opens.
    pub refuse_stream: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl Scripted {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(Ok(reply.to_string())),
            ..Default::default()
        })
    }

    pub fn streaming(deltas: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            deltas,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, model: &str, system: &str, messages: &[Message]) {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), system.to_string(), messages.to_vec()));
    }
}

impl ChatProvider for Scripted {
    fn stream_chat<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<DeltaStream, ProviderError>> {
        self.record(model, system, messages);
        let refuse = self.refuse_stream;
        let deltas: Vec<Result<String, ProviderError>> = self
            .deltas
            .iter()
            .map(|d| d.clone().map_err(ProviderError::Stream))
            .collect();
        Box::pin(async move {
            if refuse {
                return Err(ProviderError::Api {
                    status: 401,
                    message: "No auth credentials found".into(),
                });
            }
            Ok(Box::pin(stream::iter(deltas)) as DeltaStream)
        })
    }

    fn generate_text<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.record(model, system, messages);
        let reply = self.reply.clone().unwrap_or(Ok(String::new()));
        Box::pin(async move {
            reply.map_err(|status| ProviderError::Api {
                status,
                message: "upstream failed".into(),
            })
        })
    }
}

pub fn app_with(provider: Option<Arc<dyn ChatProvider>>) -> Router {
    hindemit_server::app(AppState {
        provider,
        chat_system_prompt: Arc::from("Du bist ein Test."),
        suggestions_file: None,
    })
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

pub fn conversation() -> serde_json::Value {
    serde_json::json!({
        "messages": [
            {"id": "g", "role": "assistant", "parts": [{"type": "text", "text": "Hallo!"}]},
            {"id": "u1", "role": "user", "parts": [{"type": "text", "text": "Was ist Rust?"}]},
            {"id": "a1", "role": "assistant", "parts": [{"type": "text", "text": "Eine Sprache."}]}
        ]
    })
}
