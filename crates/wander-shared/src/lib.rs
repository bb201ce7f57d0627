//! # Wander Shared
//!
//! Wire types of the posts API, shared by the HTTP adapter and its tests.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
