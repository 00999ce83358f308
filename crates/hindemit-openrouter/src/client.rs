use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use tracing::{debug, info};

use hindemit_core::models::message::Message;

use crate::error::ProviderError;
use crate::provider::{BoxFuture, ChatProvider, DeltaStream};
use crate::stream::delta_stream;
use crate::wire::{self, CompletionRequest, CompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const APP_TITLE: &str = "Hindemit AI";

/// Connection settings for OpenRouter.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound on a whole request, including reading a streamed body.
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenRouter chat completion client.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    client: ReqwestClient,
    completions_url: String,
    timeout: Duration,
}

impl OpenRouter {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| ProviderError::Config(format!("invalid API key header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert("X-Title", HeaderValue::from_static(APP_TITLE));

        let client = ReqwestClient::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let completions_url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );

        Ok(Self {
            client,
            completions_url,
            timeout: config.timeout,
        })
    }

    async fn post(&self, body: &CompletionRequest) -> Result<Response, ProviderError> {
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            stream = body.stream,
            "sending completion request"
        );
        let response = self
            .client
            .post(&self.completions_url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            status: status.as_u16(),
            message: wire::error_message(&text),
        })
    }

    /// Start a streamed completion and return its text deltas.
    pub async fn stream_chat(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<DeltaStream, ProviderError> {
        let body = CompletionRequest {
            model: model.to_string(),
            messages: wire::to_wire_messages(system, messages),
            stream: true,
        };
        let response = self.post(&body).await?;
        info!(model, "completion stream opened");
        Ok(Box::pin(delta_stream(response.bytes_stream())))
    }

    /// Run a completion to the end and return the reply text.
    pub async fn generate_text(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            model: model.to_string(),
            messages: wire::to_wire_messages(system, messages),
            stream: false,
        };
        let response = self.post(&body).await?;
        let bytes = response.bytes().await?;
        let completion: CompletionResponse = serde_json::from_slice(&bytes)?;
        let text = completion.into_text()?;
        info!(model, text_len = text.len(), "completion finished");
        Ok(text)
    }
}

impl ChatProvider for OpenRouter {
    fn stream_chat<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<DeltaStream, ProviderError>> {
        Box::pin(OpenRouter::stream_chat(self, model, system, messages))
    }

    fn generate_text<'a>(
        &'a self,
        model: &'a str,
        system: &'a str,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        Box::pin(OpenRouter::generate_text(self, model, system, messages))
    }
}
