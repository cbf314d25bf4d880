use std::fmt;

/// Custom error types for HTTP operations
///
/// Represents the failure modes of one request/response exchange, from
/// network connectivity issues to problems reading the response.
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Network-related errors (connection failed, timeout, etc.)
    Network(String),
    /// Response handling errors (body read failure, malformed response)
    Parse(String),
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::Network(msg) => write!(f, "Network error: {msg}"),
            HttpError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for HttpError {}
