//! Remote transport error types.

use std::fmt;

/// Errors that can occur while talking to a remote feature service.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// HTTP request failed (transport error or non-success status)
    HttpError(String),
    /// The service answered 200 but the body carried its error envelope
    ServiceFault { code: i64, message: String },
    /// Response body was not the expected JSON document
    InvalidResponse(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            RemoteError::ServiceFault { code, message } => {
                write!(f, "service fault {}: {}", code, message)
            }
            RemoteError::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}
