use async_trait::async_trait;
use tokio::sync::RwLock;

use wander_core::ports::CredentialStore;
use wander_core::{CredentialError, CurrentUser};

/// Credentials kept for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    user: RwLock<Option<CurrentUser>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: CurrentUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<CurrentUser>, CredentialError> {
        Ok(self.user.read().await.clone())
    }

    async fn save(&self, user: &CurrentUser) -> Result<(), CredentialError> {
        *self.user.write().await = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        self.user.write().await.take();
        Ok(())
    }
}
