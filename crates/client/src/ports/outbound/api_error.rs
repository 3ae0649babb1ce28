use thiserror::Error;

/// Errors surfaced by the API ports.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No connectivity, DNS failure, or timeout
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status, or a 2xx envelope carrying a failure code
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// Missing or rejected credential; the UI should prompt re-login
    #[error("authentication required: {0}")]
    Auth(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
