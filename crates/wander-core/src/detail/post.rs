use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{PostId, PostSummary};
use crate::interaction::PostTarget;
use crate::ports::PostService;

const LOAD_FAILED: &str =
    "Failed to load post. The post may have been deleted or you may not have permission to view it.";

/// Result of loading a post detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed(String),
    /// The view was closed before the response arrived.
    Stale,
}

#[derive(Debug, Default)]
struct DetailState {
    post: Option<PostSummary>,
    /// Bumped by every load; only the newest load may write.
    generation: u64,
    loading: bool,
    error: Option<String>,
    closed: bool,
}

/// A single post opened on its own page.
///
/// Holds its own copy of the post, separate from any feed showing it.
#[derive(Clone)]
pub struct PostDetail {
    service: Arc<dyn PostService>,
    id: PostId,
    state: Arc<Mutex<DetailState>>,
}

impl PostDetail {
    pub fn new(service: Arc<dyn PostService>, id: PostId) -> Self {
        Self {
            service,
            id,
            state: Arc::new(Mutex::new(DetailState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn post(&self) -> Option<PostSummary> {
        self.state().post.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Fetch the post. A response that is overtaken by a newer load is dropped.
    pub async fn load(&self) -> LoadOutcome {
        let generation = {
            let mut state = self.state();
            if state.closed {
                return LoadOutcome::Stale;
            }
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.generation
        };

        let result = self.service.get_post(&self.id).await;

        let mut state = self.state();
        if state.closed || state.generation != generation {
            tracing::debug!(post_id = %self.id, generation, "Discarding stale post response");
            return LoadOutcome::Stale;
        }
        state.loading = false;
        match result {
            Ok(post) => {
                state.post = Some(post);
                LoadOutcome::Loaded
            }
            Err(error) => {
                tracing::warn!(post_id = %self.id, error = %error, "Post failed to load");
                state.error = Some(LOAD_FAILED.to_string());
                LoadOutcome::Failed(LOAD_FAILED.to_string())
            }
        }
    }

    pub fn teardown(&self) {
        self.state().closed = true;
    }
}

impl PostTarget for PostDetail {
    fn read_post(&self, id: &PostId) -> Option<PostSummary> {
        let state = self.state();
        if state.closed {
            return None;
        }
        state.post.as_ref().filter(|p| &p.id == id).cloned()
    }

    fn update_post(&self, id: &PostId, apply: &mut dyn FnMut(&mut PostSummary)) -> bool {
        let mut state = self.state();
        if state.closed {
            return false;
        }
        match state.post.as_mut().filter(|p| &p.id == id) {
            Some(post) => {
                apply(post);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LikeSnapshot, Page};
    use crate::error::ServiceError;
    use crate::feed::{FeedLoader, FeedOptions};
    use crate::interaction::InteractionReconciler;
    use crate::session::{CurrentUser, SessionContext};
    use crate::testing::{ScriptedService, post};

    #[tokio::test]
    async fn test_load_and_fail() {
        let service = ScriptedService::new();
        service.push_post(Ok(post("p1", 2)));
        service.push_post(Err(ServiceError::NotFound));

        let detail = PostDetail::new(service.clone(), PostId::new("p1"));
        assert_eq!(detail.load().await, LoadOutcome::Loaded);
        assert_eq!(detail.post().map(|p| p.like_count), Some(2));

        assert!(matches!(detail.load().await, LoadOutcome::Failed(_)));
        assert_eq!(detail.error().as_deref(), Some(LOAD_FAILED));
        // The previously loaded copy stays.
        assert!(detail.post().is_some());
    }

    #[tokio::test]
    async fn test_detail_and_feed_do_not_share_mutations() {
        let service = ScriptedService::new();
        service.push_page(Ok(Page::new(vec![post("p1", 5)], false)));
        service.push_post(Ok(post("p1", 5)));
        service.push_like(Ok(()));

        let feed = FeedLoader::new(service.clone(), FeedOptions::default());
        feed.mount().await;
        let detail = PostDetail::new(service.clone(), PostId::new("p1"));
        detail.load().await;

        let session = SessionContext::signed_in(CurrentUser::new("mike", "t"));
        let rec = InteractionReconciler::new(service.clone(), session, Arc::new(detail.clone()));
        rec.like(&PostId::new("p1")).await.unwrap();

        assert_eq!(
            detail.post().unwrap().like_snapshot(),
            LikeSnapshot::new(6, true)
        );
        assert_eq!(feed.items()[0].like_snapshot(), LikeSnapshot::new(5, false));
    }

    #[tokio::test]
    async fn test_overlapping_loads_keep_newest_response() {
        let service = ScriptedService::new();
        let first = service.hold_post();
        let second = service.hold_post();
        let detail = PostDetail::new(service.clone(), PostId::new("p1"));

        let older = tokio::spawn({
            let detail = detail.clone();
            async move { detail.load().await }
        });
        tokio::task::yield_now().await;
        let newer = tokio::spawn({
            let detail = detail.clone();
            async move { detail.load().await }
        });
        tokio::task::yield_now().await;

        second.send(Ok(post("p1", 9))).unwrap();
        assert_eq!(newer.await.unwrap(), LoadOutcome::Loaded);
        first.send(Ok(post("p1", 3))).unwrap();
        assert_eq!(older.await.unwrap(), LoadOutcome::Stale);

        assert_eq!(detail.post().map(|p| p.like_count), Some(9));
        assert!(!detail.is_loading());
    }

    #[tokio::test]
    async fn test_torn_down_detail_rejects_updates() {
        let service = ScriptedService::new();
        service.push_post(Ok(post("p1", 4)));
        let detail = PostDetail::new(service.clone(), PostId::new("p1"));
        detail.load().await;
        detail.teardown();

        let id = PostId::new("p1");
        assert!(detail.read_post(&id).is_none());
        assert!(!detail.update_post(&id, &mut |p| p.like_count = 0));
        assert_eq!(detail.post().map(|p| p.like_count), Some(4));
    }
}
