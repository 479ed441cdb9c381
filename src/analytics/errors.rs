//! Error types for the analytics subsystem.

use thiserror::Error;

/// Analytics subsystem error type.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// Serialization error on the persisted history payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// HTTP client error for the event sink.
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The store is unavailable (quota, teardown, simulated failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience result alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
