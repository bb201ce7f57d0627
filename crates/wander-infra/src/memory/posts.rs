use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as Age, Utc};
use tokio::sync::{Mutex, RwLock};

use wander_core::domain::{Comment, Page, PageQuery, PostId, PostSummary};
use wander_core::feed::sample_posts;
use wander_core::ports::PostService;
use wander_core::{ServiceError, SessionContext};

/// Operations of the post service, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPosts,
    GetPost,
    ToggleLike,
    CreateComment,
    ListComments,
}

struct StoredPost {
    post: PostSummary,
    liked_by: HashSet<String>,
}

#[derive(Default)]
struct Control {
    faults: HashMap<Operation, VecDeque<ServiceError>>,
    calls: HashMap<Operation, usize>,
}

#[derive(Default)]
struct Store {
    posts: Vec<StoredPost>,
    comments: HashMap<PostId, Vec<Comment>>,
}

/// In-memory post service.
///
/// Orders and pages posts the way the remote API does, tracks likes per
/// username, and requires a signed-in session for likes and comments.
/// Failures can be queued per operation. Data is lost on process restart.
pub struct InMemoryPostService {
    session: SessionContext,
    store: RwLock<Store>,
    control: Mutex<Control>,
    latency: Option<Duration>,
}

impl InMemoryPostService {
    pub fn new(session: SessionContext) -> Self {
        Self::with_posts(session, Vec::new())
    }

    pub fn with_posts(session: SessionContext, posts: Vec<PostSummary>) -> Self {
        let posts = posts
            .into_iter()
            .map(|post| StoredPost {
                liked_by: HashSet::new(),
                post: PostSummary {
                    liked_by_current_user: false,
                    ..post
                },
            })
            .collect();
        Self {
            session,
            store: RwLock::new(Store {
                posts,
                comments: HashMap::new(),
            }),
            control: Mutex::new(Control::default()),
            latency: None,
        }
    }

    /// A backend populated with enough travel posts to page through.
    pub fn seeded(session: SessionContext) -> Self {
        let now = Utc::now();
        let mut posts = sample_posts(now);
        let places = ["Lisbon", "Kyoto", "Cusco", "Reykjavik", "Hoi An", "Marrakesh", "Queenstown"];
        for n in 0..22u64 {
            let place = places[(n as usize) % places.len()];
            posts.push(PostSummary {
                id: PostId::new(format!("post-{:02}", n + 1)),
                author_id: format!("user-{}", n % 5 + 1),
                author_display_name: format!("traveler{}", n % 5 + 1),
                author_avatar_url: None,
                text: format!("Day {} in {place}.", n % 9 + 1),
                image_urls: vec![format!("https://picsum.photos/seed/{place}-{n}/800/500")],
                created_at: now - Age::hours(2 + n as i64 * 5),
                like_count: (n * 37) % 120,
                comment_count: 0,
                liked_by_current_user: false,
            });
        }
        Self::with_posts(session, posts)
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call to `operation` fail with `error`.
    pub async fn fail_next(&self, operation: Operation, error: ServiceError) {
        self.control
            .lock()
            .await
            .faults
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Number of calls made to `operation` so far.
    pub async fn calls(&self, operation: Operation) -> usize {
        self.control
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }

    /// Current like count of a post, as the server sees it.
    pub async fn like_count(&self, id: &PostId) -> Option<u64> {
        let store = self.store.read().await;
        store
            .posts
            .iter()
            .find(|stored| &stored.post.id == id)
            .map(|stored| stored.post.like_count)
    }

    async fn enter(&self, operation: Operation) -> Result<(), ServiceError> {
        let injected = {
            let mut control = self.control.lock().await;
            *control.calls.entry(operation).or_default() += 1;
            control
                .faults
                .get_mut(&operation)
                .and_then(VecDeque::pop_front)
        };
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match injected {
            Some(error) => {
                tracing::debug!(?operation, error = %error, "Injected failure");
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn require_user(&self) -> Result<String, ServiceError> {
        self.session
            .current_user()
            .map(|user| user.username)
            .ok_or(ServiceError::Unauthorized)
    }

    fn viewer_copy(&self, stored: &StoredPost) -> PostSummary {
        let viewer = self.session.current_user().map(|user| user.username);
        PostSummary {
            liked_by_current_user: viewer.is_some_and(|name| stored.liked_by.contains(&name)),
            ..stored.post.clone()
        }
    }
}

fn slice_page<T: Clone>(all: &[T], page: usize, size: usize) -> Page<T> {
    let size = size.max(1);
    let start = page.saturating_mul(size).min(all.len());
    let end = start.saturating_add(size).min(all.len());
    Page {
        items: all[start..end].to_vec(),
        has_next: end < all.len(),
        has_previous: page > 0,
        total_pages: all.len().div_ceil(size),
        total_elements: all.len(),
        current_page: page,
    }
}

#[async_trait]
impl PostService for InMemoryPostService {
    async fn list_posts(&self, query: PageQuery) -> Result<Page<PostSummary>, ServiceError> {
        self.enter(Operation::ListPosts).await?;
        let store = self.store.read().await;
        let mut posts: Vec<PostSummary> = store.posts.iter().map(|s| self.viewer_copy(s)).collect();
        query.filter.sort(&mut posts);
        Ok(slice_page(&posts, query.page, query.size))
    }

    async fn get_post(&self, id: &PostId) -> Result<PostSummary, ServiceError> {
        self.enter(Operation::GetPost).await?;
        let store = self.store.read().await;
        store
            .posts
            .iter()
            .find(|stored| &stored.post.id == id)
            .map(|stored| self.viewer_copy(stored))
            .ok_or(ServiceError::NotFound)
    }

    async fn toggle_like(&self, id: &PostId) -> Result<(), ServiceError> {
        self.enter(Operation::ToggleLike).await?;
        let username = self.require_user()?;
        let mut store = self.store.write().await;
        let stored = store
            .posts
            .iter_mut()
            .find(|stored| &stored.post.id == id)
            .ok_or(ServiceError::NotFound)?;
        if stored.liked_by.remove(&username) {
            stored.post.like_count = stored.post.like_count.saturating_sub(1);
        } else {
            stored.liked_by.insert(username);
            stored.post.like_count += 1;
        }
        Ok(())
    }

    async fn create_comment(&self, id: &PostId, text: &str) -> Result<Comment, ServiceError> {
        self.enter(Operation::CreateComment).await?;
        let user = self.session.current_user().ok_or(ServiceError::Unauthorized)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Status {
                status: 400,
                message: "Comment text is required".to_string(),
            });
        }
        let mut store = self.store.write().await;
        let stored = store
            .posts
            .iter_mut()
            .find(|stored| &stored.post.id == id)
            .ok_or(ServiceError::NotFound)?;
        stored.post.comment_count += 1;
        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            post_id: id.clone(),
            author_id: user.id.unwrap_or_else(|| user.username.clone()),
            author_display_name: user.username,
            author_avatar_url: None,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        store
            .comments
            .entry(id.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(
        &self,
        id: &PostId,
        page: usize,
        size: usize,
    ) -> Result<Page<Comment>, ServiceError> {
        self.enter(Operation::ListComments).await?;
        let store = self.store.read().await;
        if !store.posts.iter().any(|stored| &stored.post.id == id) {
            return Err(ServiceError::NotFound);
        }
        let comments = store.comments.get(id).map(Vec::as_slice).unwrap_or_default();
        Ok(slice_page(comments, page, size))
    }
}
