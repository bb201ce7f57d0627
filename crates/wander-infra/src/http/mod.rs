//! HTTP adapters for the posts API (reqwest).

mod auth;
mod client;
mod config;
mod mapping;
mod posts;

pub use auth::HttpAuthClient;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use posts::HttpPostService;
