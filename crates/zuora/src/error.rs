//! Error types for Zuora API operations.
//!
//! Errors are categorized so callers can decide whether re-running is
//! worthwhile and what to tell the user.

use std::fmt;

/// Result type alias for Zuora operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// Credentials rejected or token unavailable.
    Auth,
    /// Resource does not exist remotely.
    NotFound,
    /// Response could not be decoded.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::NotFound => "Remote resource not found",
            Self::Format => "Unexpected response format",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your connection and the base URL, then run again",
            Self::Auth => "Verify the client id and secret for this tenant",
            Self::NotFound => "Run again to re-read the remote state",
            Self::Format => "The tenant may run an incompatible API version",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Zuora API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or the response not read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// Token acquisition failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Response body did not match the expected shape.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A query returned only part of its result set.
    #[error("query returned {returned} records but more remain")]
    IncompleteQuery {
        /// Number of records in the first page.
        returned: usize,
    },

    /// Client is not configured correctly.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http(_) => ErrorCategory::Network,
            Error::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                429 | 500..=599 => ErrorCategory::Network,
                _ => ErrorCategory::Other,
            },
            Error::Auth(_) => ErrorCategory::Auth,
            Error::InvalidResponse(_) | Error::IncompleteQuery { .. } => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::api(code, String::new()),
            other => Self::Http(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
