use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use wander_core::ports::{AuthError, AuthService, CredentialStore, Registration, validate_login};
use wander_core::{CurrentUser, SessionContext};

/// Password used by the accounts of [`InMemoryAuthService::seeded`].
pub const DEMO_PASSWORD: &str = "wander123";

/// Local accounts for the in-memory backend.
///
/// Signs the shared session in and out exactly like the HTTP client does,
/// issuing random tokens.
pub struct InMemoryAuthService {
    session: SessionContext,
    credentials: Option<Arc<dyn CredentialStore>>,
    accounts: RwLock<HashMap<String, String>>,
}

impl InMemoryAuthService {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            credentials: None,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Accounts `traveler1` to `traveler5`, all using [`DEMO_PASSWORD`].
    pub fn seeded(session: SessionContext) -> Self {
        let accounts = (1..=5)
            .map(|n| (format!("traveler{n}"), DEMO_PASSWORD.to_string()))
            .collect();
        Self {
            accounts: RwLock::new(accounts),
            ..Self::new(session)
        }
    }

    pub fn with_credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    async fn establish(&self, username: &str) -> CurrentUser {
        let user = CurrentUser::new(username, format!("memory-{}", uuid::Uuid::new_v4()))
            .with_id(username);
        self.session.sign_in(user.clone());
        if let Some(store) = &self.credentials {
            if let Err(error) = store.save(&user).await {
                tracing::warn!(error = %error, "Failed to persist credentials");
            }
        }
        user
    }
}

#[async_trait]
impl AuthService for InMemoryAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<CurrentUser, AuthError> {
        validate_login(username, password)?;
        let username = username.trim();
        let known = self
            .accounts
            .read()
            .await
            .get(username)
            .is_some_and(|stored| stored == password);
        if !known {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.establish(username).await)
    }

    async fn register(&self, registration: &Registration) -> Result<CurrentUser, AuthError> {
        validate_login(&registration.username, &registration.password)?;
        let username = registration.username.trim();
        {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(username) {
                return Err(AuthError::Validation("Username is already taken".to_string()));
            }
            accounts.insert(username.to_string(), registration.password.clone());
        }
        Ok(self.establish(username).await)
    }

    async fn logout(&self) {
        self.session.invalidate();
        if let Some(store) = &self.credentials {
            if let Err(error) = store.clear().await {
                tracing::warn!(error = %error, "Failed to clear stored credentials");
            }
        }
    }
}
