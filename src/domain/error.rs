//! Error types for the zsplash plugin.
//!
//! Two layers of errors live here. [`ApiError`] is the taxonomy the HTTP
//! adapter reports to the application layer: it is small on purpose because
//! every caller reacts to exactly two conditions (an expired session, or any
//! other failure). [`ZsplashError`] covers everything else the plugin can run
//! into, from storage I/O to malformed request context.
//!
//! An empty search term is not an error at all: `submit_search` simply
//! returns `None`.

use thiserror::Error;

/// Failure reported by the HTTP client adapter.
///
/// # Examples
///
/// ```
/// use zsplash::domain::ApiError;
///
/// let err = ApiError::failed(Some(502), "bad gateway");
/// assert!(!err.is_unauthorized());
/// assert_eq!(err.to_string(), "request failed (HTTP 502): bad gateway");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered 401 and the single refresh attempt did not help.
    #[error("session is not authorized")]
    Unauthorized,

    /// Network error, non-2xx status or an undecodable body.
    #[error("request failed{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    RequestFailed {
        /// HTTP status, when the backend answered at all.
        status: Option<u16>,
        /// Human-readable description.
        message: String,
    },
}

impl ApiError {
    /// Builds a [`ApiError::RequestFailed`].
    pub fn failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Whether this is the expired-session condition.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// The main error type for zsplash plugin operations.
#[derive(Debug, Error)]
pub enum ZsplashError {
    /// A backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Storage operation failed.
    ///
    /// Occurs when reading or writing the persisted session file fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A web request result carried a context map we did not produce.
    #[error("Request context error: {0}")]
    Context(String),
}

/// A specialized `Result` type for zsplash operations.
pub type Result<T> = std::result::Result<T, ZsplashError>;
