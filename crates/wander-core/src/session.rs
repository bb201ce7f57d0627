//! Session context - the authenticated identity shared by the feed components.
//!
//! One `SessionContext` is created at process start (optionally restored from
//! persisted credentials) and handed to every component that needs to know who
//! is signed in. Clones share the same underlying state.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;
use crate::ports::CredentialStore;

/// The signed-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub token: String,
}

impl CurrentUser {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Arc<RwLock<Option<CurrentUser>>>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: Arc::new(RwLock::new(Some(user))),
        }
    }

    /// Populate a session from persisted credentials.
    pub async fn restore(store: &dyn CredentialStore) -> Result<Self, CredentialError> {
        let user = store.load().await?;
        match &user {
            Some(user) => tracing::info!(username = %user.username, "Session restored"),
            None => tracing::debug!("No stored credentials, starting anonymous"),
        }
        Ok(Self {
            user: Arc::new(RwLock::new(user)),
        })
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|u| u.token.clone())
    }

    pub fn sign_in(&self, user: CurrentUser) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Drop the current identity (logout or a rejected token).
    pub fn invalidate(&self) {
        let previous = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(user) = previous {
            tracing::info!(username = %user.username, "Session invalidated");
        }
    }
}
