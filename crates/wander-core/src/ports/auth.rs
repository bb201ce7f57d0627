//! Authentication port.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::session::CurrentUser;

/// Registration form submitted to the remote service.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Remote authentication service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a signed-in user.
    async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError>;

    /// Create an account and sign it in.
    async fn register(&self, registration: &Registration) -> Result<CurrentUser, AuthError>;

    /// Sign out locally and forget stored credentials.
    async fn logout(&self);
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Server did not return a token")]
    MissingToken,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Check a login form before it is sent.
pub fn validate_login(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    if password.chars().count() < 6 {
        return Err(AuthError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert!(validate_login("sarah", "secret1").is_ok());
        assert!(matches!(
            validate_login("  ", "secret1"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            validate_login("sarah", "abc"),
            Err(AuthError::Validation(msg)) if msg.contains("6 characters")
        ));
    }
}
