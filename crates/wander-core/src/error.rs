//! Error types of the feed core.

use thiserror::Error;

use crate::domain::PostId;

/// Failures reported by the remote post service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Short description suitable for an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Network(_) | ServiceError::Timeout => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ServiceError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ServiceError::NotFound => "The requested content no longer exists.".to_string(),
            ServiceError::Status { status, message } if !message.is_empty() => {
                format!("The server rejected the request ({status}): {message}")
            }
            ServiceError::Status { status, .. } => {
                format!("The server rejected the request ({status}).")
            }
            ServiceError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}

/// An interaction refused before any network call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Sign in required")]
    NotAuthenticated,

    #[error("Comment text is empty")]
    EmptyComment,

    #[error("Post {0} is not displayed here")]
    UnknownPost(PostId),
}

/// Credential storage failures.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential storage I/O failed: {0}")]
    Io(String),

    #[error("Stored credentials are corrupt: {0}")]
    Corrupt(String),
}
