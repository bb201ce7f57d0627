//! Wire DTO to domain conversions.

use wander_core::domain::{Comment, Page, PostId, PostSummary};
use wander_shared::dto::{
    CommentDto, CommentsPageResponse, PostDetailResponse, PostDto, PostsPageResponse,
};

const UNKNOWN_USER: &str = PostDetailResponse::UNKNOWN_USER;

pub(super) fn post(dto: PostDto) -> PostSummary {
    PostSummary {
        id: PostId::new(dto.id),
        author_id: dto.user_id,
        author_display_name: dto.username,
        author_avatar_url: dto.profile_image_url,
        text: dto.text,
        image_urls: dto.image_urls,
        created_at: dto.created_at,
        like_count: dto.like_count,
        comment_count: dto.comment_count,
        liked_by_current_user: dto.liked_by_current_user,
    }
}

pub(super) fn post_page(response: PostsPageResponse) -> Page<PostSummary> {
    Page {
        items: response.posts.into_iter().map(post).collect(),
        has_next: response.has_next,
        has_previous: response.has_previous,
        total_pages: response.total_pages,
        total_elements: response.total_elements,
        current_page: response.current_page,
    }
}

pub(super) fn post_detail(response: PostDetailResponse) -> PostSummary {
    let author_display_name = response.display_name();
    let author_avatar_url = response.avatar_url();
    PostSummary {
        id: PostId::new(response.id),
        author_id: response.user_id,
        author_display_name,
        author_avatar_url,
        text: response.text,
        image_urls: response.image_urls,
        created_at: response.created_at,
        like_count: response.like_count,
        comment_count: response.comment_count,
        liked_by_current_user: response.liked_by_current_user,
    }
}

pub(super) fn comment(dto: CommentDto, post_id: &PostId) -> Comment {
    let (author_display_name, author_avatar_url) = match dto.user {
        Some(user) if !user.username.is_empty() => (user.username, user.profile_image_url),
        Some(user) => (UNKNOWN_USER.to_string(), user.profile_image_url),
        None => (UNKNOWN_USER.to_string(), None),
    };
    Comment {
        id: dto.id,
        post_id: dto.post_id.map(PostId::new).unwrap_or_else(|| post_id.clone()),
        author_id: dto.user_id,
        author_display_name,
        author_avatar_url,
        text: dto.text,
        created_at: dto.created_at,
    }
}

pub(super) fn comment_page(response: CommentsPageResponse, post_id: &PostId) -> Page<Comment> {
    Page {
        items: response
            .comments
            .into_iter()
            .map(|dto| comment(dto, post_id))
            .collect(),
        has_next: response.has_next,
        has_previous: response.has_previous,
        total_pages: response.total_pages,
        total_elements: response.total_elements,
        current_page: response.current_page,
    }
}
