//! Error types for the chat subsystem.

use thiserror::Error;

/// Chat subsystem error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No Gemini API key is configured for this call path.
    #[error("gemini api key is not configured")]
    MissingApiKey,
    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// The generation endpoint answered with a non-success status.
    #[error("gemini http status not ok: {0}")]
    HttpStatusNotOk(u16),
    /// The generation response parsed but contained no candidate text.
    #[error("gemini response contained no candidate text")]
    EmptyResponse,
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// A user message was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
