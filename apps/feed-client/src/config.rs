//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use wander_core::feed::DEFAULT_PAGE_SIZE;

#[cfg(feature = "http")]
use wander_infra::ApiConfig;

/// Which post service the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The remote posts API.
    Http,
    /// The seeded in-memory backend.
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "remote" => Ok(BackendKind::Http),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    #[cfg(feature = "http")]
    pub api: ApiConfig,
    pub page_size: usize,
    /// Rows from the end of the list at which the next page is requested.
    pub prefetch_distance: usize,
    /// Production builds never show the sample posts.
    pub production: bool,
    pub credentials_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_backend = if cfg!(feature = "http") {
            BackendKind::Http
        } else {
            BackendKind::Memory
        };
        let environment = lookup("APP_ENV")
            .or_else(|| lookup("RUST_ENV"))
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase();

        Self {
            backend: lookup("FEED_BACKEND")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_backend),
            #[cfg(feature = "http")]
            api: ApiConfig::from_lookup(&lookup),
            page_size: lookup("FEED_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            prefetch_distance: lookup("FEED_PREFETCH_DISTANCE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            production: matches!(environment.as_str(), "production" | "prod"),
            credentials_path: lookup("CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".wander/credentials.json")),
        }
    }
}
