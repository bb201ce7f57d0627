use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Comment, PostId};
use crate::paging::{FetchOutcome, PageCursor, PagedState};
use crate::ports::PostService;

const COMMENTS_FAILED: &str = "Failed to load comments. Please try again later.";

/// Comments requested per page.
pub const COMMENT_PAGE_SIZE: usize = 10;

/// Rendering copy of a comment thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadView {
    pub comments: Vec<Comment>,
    pub has_more: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Paginated comments of one post, oldest page first.
#[derive(Clone)]
pub struct CommentThread {
    service: Arc<dyn PostService>,
    post_id: PostId,
    page_size: usize,
    state: Arc<Mutex<PagedState<Comment>>>,
}

impl CommentThread {
    pub fn new(service: Arc<dyn PostService>, post_id: PostId) -> Self {
        Self {
            service,
            post_id,
            page_size: COMMENT_PAGE_SIZE,
            state: Arc::new(Mutex::new(PagedState::new())),
        }
    }

    fn state(&self) -> MutexGuard<'_, PagedState<Comment>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> ThreadView {
        let state = self.state();
        ThreadView {
            comments: state.items().to_vec(),
            has_more: state.has_more(),
            is_loading: state.is_loading(),
            error: state.error().map(|fault| fault.message.clone()),
        }
    }

    /// Load the first page, once.
    pub async fn mount(&self) -> FetchOutcome {
        let cursor = self.state().begin_initial();
        self.run(cursor).await
    }

    pub async fn load_more(&self) -> FetchOutcome {
        let cursor = self.state().begin_next();
        self.run(cursor).await
    }

    /// Start over from page 0, e.g. after a comment was posted.
    pub async fn reload(&self) -> FetchOutcome {
        let cursor = self.state().refresh();
        self.run(cursor).await
    }

    /// Re-request the page that failed. Pages that loaded are never fetched twice.
    pub async fn retry(&self) -> FetchOutcome {
        let cursor = self.state().begin_retry();
        self.run(cursor).await
    }

    pub fn teardown(&self) {
        self.state().close();
    }

    async fn run(&self, cursor: Option<PageCursor>) -> FetchOutcome {
        let Some(cursor) = cursor else {
            return FetchOutcome::Skipped;
        };
        let result = self
            .service
            .list_comments(&self.post_id, cursor.page_index, self.page_size)
            .await;
        if let Err(error) = &result {
            tracing::warn!(post_id = %self.post_id, page = cursor.page_index, error = %error, "Comments failed to load");
        }
        self.state()
            .complete(cursor, result, |_| COMMENTS_FAILED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Page;
    use crate::error::ServiceError;
    use crate::testing::{Call, ScriptedService, comment};

    fn page(ids: &[&str], has_next: bool) -> Page<Comment> {
        Page::new(ids.iter().map(|id| comment(id, "p1", "nice")).collect(), has_next)
    }

    fn ids(thread: &CommentThread) -> Vec<String> {
        thread.view().comments.into_iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn test_pages_append_until_exhausted() {
        let service = ScriptedService::new();
        service.push_comment_page(Ok(page(&["c1", "c2"], true)));
        service.push_comment_page(Ok(page(&["c3"], false)));
        let thread = CommentThread::new(service.clone(), PostId::new("p1"));

        thread.mount().await;
        thread.load_more().await;
        assert_eq!(ids(&thread), vec!["c1", "c2", "c3"]);
        assert!(!thread.view().has_more);
        assert_eq!(thread.load_more().await, FetchOutcome::Skipped);
        assert_eq!(
            service.calls(),
            vec![
                Call::ListComments(PostId::new("p1"), 0),
                Call::ListComments(PostId::new("p1"), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_reload_discards_outstanding_page() {
        let service = ScriptedService::new();
        service.push_comment_page(Ok(page(&["c1"], true)));
        let thread = CommentThread::new(service.clone(), PostId::new("p1"));
        thread.mount().await;

        let gate = service.hold_comment_page();
        service.push_comment_page(Ok(page(&["c0", "c1"], true)));
        let older = tokio::spawn({
            let thread = thread.clone();
            async move { thread.load_more().await }
        });
        tokio::task::yield_now().await;

        thread.reload().await;
        gate.send(Ok(page(&["c2"], false))).unwrap();
        assert_eq!(older.await.unwrap(), FetchOutcome::Stale);
        assert_eq!(ids(&thread), vec!["c0", "c1"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_comments_for_retry() {
        let service = ScriptedService::new();
        service.push_comment_page(Ok(page(&["c1"], true)));
        service.push_comment_page(Err(ServiceError::Timeout));
        service.push_comment_page(Ok(page(&["c2"], false)));
        let thread = CommentThread::new(service.clone(), PostId::new("p1"));

        thread.mount().await;
        assert!(matches!(thread.load_more().await, FetchOutcome::Failed(_)));
        assert_eq!(thread.view().error.as_deref(), Some(COMMENTS_FAILED));
        assert_eq!(ids(&thread), vec!["c1"]);

        thread.retry().await;
        assert_eq!(ids(&thread), vec!["c1", "c2"]);
        assert!(thread.view().error.is_none());
    }

    #[tokio::test]
    async fn test_retry_after_success_fetches_nothing() {
        let service = ScriptedService::new();
        service.push_comment_page(Ok(page(&["c1"], true)));
        service.push_comment_page(Ok(page(&["c2"], true)));
        let thread = CommentThread::new(service.clone(), PostId::new("p1"));

        thread.mount().await;
        thread.load_more().await;
        assert_eq!(thread.retry().await, FetchOutcome::Skipped);
        assert_eq!(ids(&thread), vec!["c1", "c2"]);
        assert_eq!(service.calls().len(), 2);
    }
}
