use async_trait::async_trait;

use crate::error::CredentialError;
use crate::session::CurrentUser;

/// Persistent storage for the signed-in user's credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load stored credentials, if any.
    async fn load(&self) -> Result<Option<CurrentUser>, CredentialError>;

    /// Persist credentials, replacing any previous ones.
    async fn save(&self, user: &CurrentUser) -> Result<(), CredentialError>;

    /// Remove stored credentials.
    async fn clear(&self) -> Result<(), CredentialError>;
}
