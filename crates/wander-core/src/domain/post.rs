use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque post identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Post summary entity - the unit of feed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    pub author_id: String,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,
    pub text: String,
    /// Ordered image URLs. Only the first one is shown in the feed.
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: u64,
    pub comment_count: u64,
    pub liked_by_current_user: bool,
}

impl PostSummary {
    /// Image displayed for this post in the feed.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Current like fields of this post.
    pub fn like_snapshot(&self) -> LikeSnapshot {
        LikeSnapshot {
            like_count: self.like_count,
            liked: self.liked_by_current_user,
        }
    }

    pub fn apply_like_snapshot(&mut self, snapshot: LikeSnapshot) {
        self.like_count = snapshot.like_count;
        self.liked_by_current_user = snapshot.liked;
    }
}

/// The like-related fields of a post, captured or restored as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeSnapshot {
    pub like_count: u64,
    pub liked: bool,
}

impl LikeSnapshot {
    pub fn new(like_count: u64, liked: bool) -> Self {
        Self { like_count, liked }
    }

    /// State after the current user toggles their like once.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                like_count: self.like_count.saturating_sub(1),
                liked: false,
            }
        } else {
            Self {
                like_count: self.like_count + 1,
                liked: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let start = LikeSnapshot::new(4, false);
        assert_eq!(start.toggled(), LikeSnapshot::new(5, true));
        assert_eq!(start.toggled().toggled(), start);
    }

    #[test]
    fn test_unlike_never_goes_negative() {
        let odd = LikeSnapshot::new(0, true);
        assert_eq!(odd.toggled(), LikeSnapshot::new(0, false));
    }
}
