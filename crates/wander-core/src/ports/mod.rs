//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod credentials;
mod post_service;

pub use auth::{AuthError, AuthService, Registration, validate_login};
pub use credentials::CredentialStore;
pub use post_service::PostService;
