use async_trait::async_trait;

use crate::domain::{Comment, Page, PageQuery, PostId, PostSummary};
use crate::error::ServiceError;

/// Remote post service - abstraction over the HTTP API (or an in-memory stand-in).
///
/// Implementations attach the current session's bearer token themselves.
#[async_trait]
pub trait PostService: Send + Sync {
    /// Fetch one page of the feed, ordered by `query.filter`.
    async fn list_posts(&self, query: PageQuery) -> Result<Page<PostSummary>, ServiceError>;

    /// Fetch a single post.
    async fn get_post(&self, id: &PostId) -> Result<PostSummary, ServiceError>;

    /// Toggle the caller's like on a post.
    async fn toggle_like(&self, id: &PostId) -> Result<(), ServiceError>;

    /// Create a comment on a post.
    async fn create_comment(&self, id: &PostId, text: &str) -> Result<Comment, ServiceError>;

    /// Fetch one page of a post's comments, oldest first.
    async fn list_comments(
        &self,
        id: &PostId,
        page: usize,
        size: usize,
    ) -> Result<Page<Comment>, ServiceError>;
}
