//! Sample posts shown when the feed cannot be loaded in development builds.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{PostId, PostSummary};

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x500";
const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/100";

/// Three fixed travel posts, timestamped relative to `now`.
pub fn sample_posts(now: DateTime<Utc>) -> Vec<PostSummary> {
    let entry = |id: &str, author: &str, text: &str, age: Duration, likes: u64, comments: u64, liked: bool| {
        PostSummary {
            id: PostId::new(id),
            author_id: id.to_string(),
            author_display_name: author.to_string(),
            author_avatar_url: Some(PLACEHOLDER_AVATAR.to_string()),
            text: text.to_string(),
            image_urls: vec![PLACEHOLDER_IMAGE.to_string()],
            created_at: now - age,
            like_count: likes,
            comment_count: comments,
            liked_by_current_user: liked,
        }
    };

    vec![
        entry(
            "sample-1",
            "John Traveler",
            "Just arrived in Bali! The beaches here are absolutely stunning.",
            Duration::hours(1),
            24,
            5,
            false,
        ),
        entry(
            "sample-2",
            "Sarah Explorer",
            "Hiking through the Swiss Alps was an incredible experience.",
            Duration::days(1),
            87,
            12,
            true,
        ),
        entry(
            "sample-3",
            "Mike Foodie",
            "The street food in Bangkok is out of this world!",
            Duration::days(2),
            56,
            8,
            false,
        ),
    ]
}
