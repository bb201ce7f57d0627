//! In-memory backend - development server stand-in and test double.

mod auth;
mod posts;

pub use auth::{DEMO_PASSWORD, InMemoryAuthService};
pub use posts::{InMemoryPostService, Operation};
