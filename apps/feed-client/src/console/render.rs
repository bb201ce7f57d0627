//! Plain-text rendering of feed and post views.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use wander_core::detail::ThreadView;
use wander_core::domain::{Comment, PostSummary};
use wander_core::feed::FeedState;

/// "just now", "5m ago", "3h ago", "2d ago", or the date for older posts.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(at);
    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h ago", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d ago", age.num_days())
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

fn post_row(out: &mut String, index: usize, post: &PostSummary, now: DateTime<Utc>) {
    let heart = if post.liked_by_current_user { "*" } else { " " };
    let _ = writeln!(
        out,
        "{index:>3}. [{}] {} . {}",
        post.id,
        post.author_display_name,
        relative_time(post.created_at, now)
    );
    let _ = writeln!(out, "     {}", post.text);
    if let Some(image) = post.cover_image() {
        let _ = writeln!(out, "     {image}");
    }
    let _ = writeln!(
        out,
        "     {heart}{} likes  {} comments",
        post.like_count, post.comment_count
    );
}

/// Rows `first..=last` of the feed with its banners.
pub fn feed(state: &FeedState, first: usize, last: usize, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", state.filter());
    if let Some(error) = state.error() {
        let _ = writeln!(out, "! {} (type 'retry')", error.message);
    }
    if state.is_showing_fallback() {
        let _ = writeln!(out, "(showing sample posts)");
    }

    let items = state.visible_items();
    for (index, post) in items.iter().enumerate().take(last + 1).skip(first) {
        post_row(&mut out, index, post, now);
    }

    if state.is_loading() {
        let _ = writeln!(out, "   loading...");
    } else if !state.has_more() && !items.is_empty() && state.error().is_none() {
        let _ = writeln!(out, "   -- end of feed --");
    } else if items.is_empty() && state.error().is_none() {
        let _ = writeln!(out, "   no posts yet");
    }
    out
}

fn comment_row(out: &mut String, comment: &Comment, now: DateTime<Utc>) {
    let _ = writeln!(
        out,
        "   {} . {}: {}",
        comment.author_display_name,
        relative_time(comment.created_at, now),
        comment.text
    );
}

/// A post with its comment thread.
pub fn detail(
    post: Option<&PostSummary>,
    error: Option<&str>,
    thread: &ThreadView,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    match (post, error) {
        (_, Some(error)) => {
            let _ = writeln!(out, "! {error}");
        }
        (Some(post), None) => post_row(&mut out, 0, post, now),
        (None, None) => {
            let _ = writeln!(out, "   loading...");
        }
    }
    if let Some(post) = post {
        for image in post.image_urls.iter().skip(1) {
            let _ = writeln!(out, "     {image}");
        }
    }

    let _ = writeln!(out, "-- comments --");
    if let Some(error) = &thread.error {
        let _ = writeln!(out, "! {error}");
    }
    for comment in &thread.comments {
        comment_row(&mut out, comment, now);
    }
    if thread.is_loading {
        let _ = writeln!(out, "   loading...");
    } else if thread.comments.is_empty() && thread.error.is_none() {
        let _ = writeln!(out, "   no comments yet");
    } else if thread.has_more {
        let _ = writeln!(out, "   (scroll for more)");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use wander_core::domain::FeedFilter;
    use wander_core::feed::sample_posts;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_time() {
        let now = now();
        assert_eq!(relative_time(now - Duration::seconds(20), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(40), now), "Apr 22, 2024");
    }

    #[test]
    fn test_feed_window_and_banners() {
        let mut state = FeedState::new(FeedFilter::Latest);
        assert!(feed(&state, 0, 4, now()).contains("no posts yet"));

        let ticket = state.begin_initial().unwrap();
        let page = wander_core::domain::Page::new(sample_posts(now()), false);
        state.complete(ticket, Ok(page), None);

        let text = feed(&state, 1, 1, now());
        assert!(text.contains("[sample-2]"));
        assert!(!text.contains("[sample-1]"));
        assert!(text.contains("end of feed"));
    }
}
