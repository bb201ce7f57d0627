//! Application state - the session and the services every view shares.

use std::sync::Arc;

use wander_core::SessionContext;
use wander_core::feed::FeedOptions;
use wander_core::ports::{AuthService, CredentialStore, PostService};
use wander_infra::{FileCredentialStore, InMemoryAuthService, InMemoryPostService};

use crate::config::{AppConfig, BackendKind};

#[cfg(feature = "http")]
use wander_infra::{ApiClient, HttpAuthClient, HttpPostService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionContext,
    pub posts: Arc<dyn PostService>,
    pub auth: Arc<dyn AuthService>,
    pub feed_options: FeedOptions,
    pub prefetch_distance: usize,
}

impl AppState {
    /// Restore the session and build the configured backend.
    pub async fn new(config: &AppConfig) -> Self {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&config.credentials_path));

        let session = match SessionContext::restore(store.as_ref()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable credentials");
                if let Err(e) = store.clear().await {
                    tracing::warn!(error = %e, "Failed to remove unreadable credentials");
                }
                SessionContext::anonymous()
            }
        };

        let (posts, auth) = Self::services(config, &session, store);

        let feed_options = if config.production {
            FeedOptions::default()
        } else {
            FeedOptions::development()
        }
        .with_page_size(config.page_size);

        tracing::info!(
            backend = ?config.backend,
            signed_in = session.is_authenticated(),
            page_size = feed_options.page_size,
            "Application state initialized"
        );

        Self {
            session,
            posts,
            auth,
            feed_options,
            prefetch_distance: config.prefetch_distance,
        }
    }

    fn services(
        config: &AppConfig,
        session: &SessionContext,
        store: Arc<dyn CredentialStore>,
    ) -> (Arc<dyn PostService>, Arc<dyn AuthService>) {
        match config.backend {
            #[cfg(feature = "http")]
            BackendKind::Http => match ApiClient::new(&config.api, session.clone()) {
                Ok(client) => {
                    tracing::info!(base_url = %config.api.base_url, "Using remote posts API");
                    let client = client.with_credentials(store);
                    (
                        Arc::new(HttpPostService::new(client.clone())),
                        Arc::new(HttpAuthClient::new(client)),
                    )
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to build HTTP client: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(session, store)
                }
            },
            #[cfg(not(feature = "http"))]
            BackendKind::Http => {
                tracing::warn!("Running without http feature - using in-memory backend");
                Self::in_memory(session, store)
            }
            BackendKind::Memory => Self::in_memory(session, store),
        }
    }

    fn in_memory(
        session: &SessionContext,
        store: Arc<dyn CredentialStore>,
    ) -> (Arc<dyn PostService>, Arc<dyn AuthService>) {
        tracing::info!("Using seeded in-memory backend");
        (
            Arc::new(InMemoryPostService::seeded(session.clone())),
            Arc::new(InMemoryAuthService::seeded(session.clone()).with_credentials(store)),
        )
    }
}
