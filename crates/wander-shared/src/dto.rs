//! Data Transfer Objects - request/response bodies of the posts API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A post as listed by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub liked_by_current_user: bool,
}

/// Response of `GET /posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPageResponse {
    #[serde(default)]
    pub posts: Vec<PostDto>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
    #[serde(default)]
    pub current_page: usize,
}

/// Author block nested in a post detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Response of `GET /posts/{id}`.
///
/// Author fields arrive either flattened (`username`, `profileImageUrl`) or
/// nested under `author`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub author: Option<AuthorDto>,
    #[serde(default)]
    pub liked_by_current_user: bool,
    #[serde(default)]
    pub username: Option<String>,
    /// `None` when absent, `Some(None)` when explicitly null.
    #[serde(default, deserialize_with = "present")]
    pub profile_image_url: Option<Option<String>>,
}

impl PostDetailResponse {
    pub const UNKNOWN_USER: &'static str = "Unknown User";

    /// Display name, preferring the flattened field.
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.author
                    .as_ref()
                    .and_then(|a| a.username.as_deref())
                    .filter(|name| !name.is_empty())
            })
            .unwrap_or(Self::UNKNOWN_USER)
            .to_string()
    }

    /// Avatar URL; a flattened field wins even when it is null.
    pub fn avatar_url(&self) -> Option<String> {
        match &self.profile_image_url {
            Some(flattened) => flattened.clone(),
            None => self
                .author
                .as_ref()
                .and_then(|a| a.profile_image_url.clone()),
        }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Author block of a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUserDto {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// A comment as returned by the comments endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(alias = "content")]
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "author")]
    pub user: Option<CommentUserDto>,
}

/// Response of `GET /posts/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPageResponse {
    #[serde(default)]
    pub comments: Vec<CommentDto>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
    #[serde(default)]
    pub current_page: usize,
}

/// Request to comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response of `POST /users/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Strip the quotes some servers leave around a bare token body.
pub fn clean_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed).to_string()
}
