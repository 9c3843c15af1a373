//! Error types for the VectraDB SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, VectraError>;

/// VectraDB client error types
#[derive(Error, Debug)]
pub enum VectraError {
    // Client-side errors, raised before any request is sent
    #[error("Validation error: {0}")]
    Validation(String),

    // Transport-level failures (connect, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    // Non-2xx responses, message taken from the server's error body
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    // Response body was not valid JSON or not the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl VectraError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        VectraError::Validation(message.into())
    }

    /// HTTP status code, when this is an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            VectraError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the server rejected the request as unauthenticated
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if the addressed resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the request conflicted with existing state
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Check if the server itself failed
    pub fn is_server_error(&self) -> bool {
        matches!(self, VectraError::Api { status, .. } if *status >= 500)
    }
}

/// Shared body of the fail-fast entry points: unwrap or panic with the
/// error's display form.
pub(crate) fn or_fail<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("{}", error),
    }
}
