//! # Wander Infrastructure
//!
//! Concrete implementations of the ports defined in `wander-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No network stack, in-memory backend only
//! - `http` - reqwest-based post service and auth client

pub mod credentials;
pub mod memory;

#[cfg(feature = "http")]
pub mod http;

// Re-exports - In-Memory
pub use credentials::{FileCredentialStore, InMemoryCredentialStore};
pub use memory::{InMemoryAuthService, InMemoryPostService, Operation};

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use http::{ApiClient, ApiConfig, HttpAuthClient, HttpPostService};
