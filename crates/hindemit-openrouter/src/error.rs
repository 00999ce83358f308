use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("client configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] hindemit_core::error::CoreError),
}
