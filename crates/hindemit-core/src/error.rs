use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("event stream frame exceeds {0} bytes")]
    FrameTooLarge(usize),

    #[error("invalid UTF-8 in event stream: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
