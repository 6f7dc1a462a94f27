//! Custom error types for prlens with improved type safety and error handling.

use thiserror::Error;

fn join_messages(messages: &[String]) -> String {
    messages.join("; ")
}

/// Main error type for prlens operations.
#[derive(Error, Debug)]
pub enum PrlensError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Network/API errors
    #[error("GitHub authentication failed: {0}")]
    AuthenticationError(String),

    #[error("GitHub API error: {}", join_messages(.messages))]
    ApiError { messages: Vec<String> },

    #[error("GitHub rate limit exhausted, resets at {reset_at}")]
    RateLimitExceeded { reset_at: String },

    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("Repository lookup failed: {0}")]
    RepoNotFound(String),

    // Parsing errors - automatic conversions via #[from]
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using PrlensError
pub type Result<T> = std::result::Result<T, PrlensError>;

impl PrlensError {
    /// Create a generic API error from a single message
    pub fn api(msg: impl Into<String>) -> Self {
        Self::ApiError {
            messages: vec![msg.into()],
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for PrlensError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for PrlensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status()
                && status.as_u16() == 401
            {
                Self::AuthenticationError(err.to_string())
            } else {
                Self::NetworkError(err.to_string())
            }
        } else if err.is_decode() {
            Self::api(format!("failed to decode GitHub response: {err}"))
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for PrlensError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}
