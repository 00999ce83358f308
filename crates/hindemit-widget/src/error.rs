use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("chat stream failed: {0}")]
    Stream(String),

    #[error(transparent)]
    Core(#[from] hindemit_core::error::CoreError),
}
