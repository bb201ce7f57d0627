use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PostId;

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: PostId,
    pub author_id: String,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
