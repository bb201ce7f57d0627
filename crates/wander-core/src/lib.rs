//! # Wander Core
//!
//! Feed pagination and optimistic interactions for the Wander travel feed.
//! This crate holds the domain types, the ports the remote service must
//! implement, and the two components built on them:
//!
//! - [`feed::FeedLoader`] - fetches pages, merges them, switches filters and
//!   drops responses that belong to a superseded session.
//! - [`interaction::InteractionReconciler`] - applies likes optimistically with
//!   rollback, and comments once the server confirms them.
//!
//! No HTTP or runtime dependencies live here.

pub mod detail;
pub mod domain;
pub mod error;
pub mod feed;
pub mod interaction;
pub mod paging;
pub mod ports;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CredentialError, Refusal, ServiceError};
pub use session::{CurrentUser, SessionContext};
