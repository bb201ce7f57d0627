use async_trait::async_trait;
use reqwest::Method;

use wander_core::ServiceError;
use wander_core::domain::{Comment, Page, PageQuery, PostId, PostSummary};
use wander_core::ports::PostService;
use wander_shared::dto::{
    CommentDto, CommentsPageResponse, CreateCommentRequest, PostDetailResponse, PostsPageResponse,
};

use super::{ApiClient, mapping};

/// [`PostService`] backed by the remote posts API.
#[derive(Clone)]
pub struct HttpPostService {
    client: ApiClient,
}

impl HttpPostService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PostService for HttpPostService {
    async fn list_posts(&self, query: PageQuery) -> Result<Page<PostSummary>, ServiceError> {
        let request = self.client.request(Method::GET, "/posts").query(&[
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
            ("isPopular", query.filter.is_popular().to_string()),
            ("isNew", query.filter.is_new().to_string()),
        ]);
        let response: PostsPageResponse = self.client.send_json(request).await?;
        tracing::debug!(
            page = query.page,
            filter = %query.filter,
            received = response.posts.len(),
            has_next = response.has_next,
            "Fetched feed page"
        );
        Ok(mapping::post_page(response))
    }

    async fn get_post(&self, id: &PostId) -> Result<PostSummary, ServiceError> {
        let request = self.client.request(Method::GET, &format!("/posts/{id}"));
        let response: PostDetailResponse = self.client.send_json(request).await?;
        Ok(mapping::post_detail(response))
    }

    async fn toggle_like(&self, id: &PostId) -> Result<(), ServiceError> {
        let request = self.client.request(Method::POST, &format!("/posts/{id}/like"));
        self.client.send(request).await?;
        Ok(())
    }

    async fn create_comment(&self, id: &PostId, text: &str) -> Result<Comment, ServiceError> {
        let request = self
            .client
            .request(Method::POST, &format!("/posts/{id}/comments"))
            .json(&CreateCommentRequest {
                text: text.to_string(),
            });
        let response: CommentDto = self.client.send_json(request).await?;
        Ok(mapping::comment(response, id))
    }

    async fn list_comments(
        &self,
        id: &PostId,
        page: usize,
        size: usize,
    ) -> Result<Page<Comment>, ServiceError> {
        let request = self
            .client
            .request(Method::GET, &format!("/posts/{id}/comments"))
            .query(&[("page", page), ("size", size)]);
        let response: CommentsPageResponse = self.client.send_json(request).await?;
        Ok(mapping::comment_page(response, id))
    }
}
