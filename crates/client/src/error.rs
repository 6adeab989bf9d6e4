//! Client error taxonomy.
//!
//! Everything here is scoped to the triggering operation; nothing is fatal
//! to the process. The dispatcher recovers locally only from the single
//! 401-refresh pass - all other failures propagate unmodified.

use thiserror::Error;

/// Errors returned by the request dispatcher and the domain façades.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure before any response was received.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx backend response (other than an authentication failure).
    ///
    /// Carries the backend-provided message when present, else the status
    /// canonical reason.
    #[error("{message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Backend-provided message or status text.
        message: String,
    },

    /// A 401 survived one refresh-and-retry cycle, or the refresh itself
    /// failed. The session is gone; the caller should treat this as a
    /// logout.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The backend returned a 2xx body that does not match the expected
    /// shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A 2xx response whose payload signals failure or is missing the
    /// fields its declared mode requires.
    #[error("{0}")]
    UnexpectedResponse(String),

    /// Token or local-record persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from the key-value persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record is not valid JSON.
    #[error("corrupt storage record: {0}")]
    Corrupt(#[from] serde_json::Error),
}
