use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::fallback::sample_posts;
use super::state::{FeedState, FetchOutcome, PageTicket};
use super::viewport::EndOfListProbe;
use crate::domain::{FeedFilter, PostId, PostSummary};
use crate::interaction::PostTarget;
use crate::ports::PostService;

/// Posts requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Feed loader configuration.
#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub page_size: usize,
    /// Posts displayed in place of an empty feed after a failed load.
    pub fallback: Option<Vec<PostSummary>>,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fallback: None,
        }
    }
}

impl FeedOptions {
    /// Options for a non-production build: the sample posts act as fallback.
    pub fn development() -> Self {
        Self {
            fallback: Some(sample_posts(Utc::now())),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Owns the paginated feed of one mounted view.
///
/// Clones are handles to the same feed. All state changes happen
/// synchronously under a lock that is never held across a network call.
#[derive(Clone)]
pub struct FeedLoader {
    service: Arc<dyn PostService>,
    state: Arc<Mutex<FeedState>>,
    options: Arc<FeedOptions>,
}

impl FeedLoader {
    pub fn new(service: Arc<dyn PostService>, options: FeedOptions) -> Self {
        Self::with_filter(service, options, FeedFilter::default())
    }

    pub fn with_filter(
        service: Arc<dyn PostService>,
        options: FeedOptions,
        filter: FeedFilter,
    ) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(FeedState::new(filter))),
            options: Arc::new(options),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current feed state for rendering.
    pub fn view(&self) -> FeedState {
        self.state().clone()
    }

    pub fn items(&self) -> Vec<PostSummary> {
        self.state().items().to_vec()
    }

    pub fn filter(&self) -> FeedFilter {
        self.state().filter()
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    /// Load the first page of the session, once.
    pub async fn mount(&self) -> FetchOutcome {
        let ticket = self.state().begin_initial();
        self.run(ticket).await
    }

    /// Switch the sort filter, resetting the feed and loading page 0.
    pub async fn set_filter(&self, filter: FeedFilter) -> FetchOutcome {
        let ticket = {
            let mut state = self.state();
            if state.set_filter(filter) {
                state.begin(0)
            } else {
                None
            }
        };
        self.run(ticket).await
    }

    /// Fetch `page_index` of the active session.
    ///
    /// Page 0 replaces the feed, later pages append. A request naming a filter
    /// other than the active one is not issued.
    pub async fn fetch_page(&self, page_index: usize, filter: FeedFilter) -> FetchOutcome {
        let ticket = {
            let mut state = self.state();
            if state.filter() != filter {
                tracing::debug!(
                    requested = %filter,
                    active = %state.filter(),
                    "Ignoring fetch for inactive filter"
                );
                None
            } else {
                state.begin(page_index)
            }
        };
        self.run(ticket).await
    }

    /// Load the next page if there is one and nothing is in flight.
    pub async fn maybe_load_next(&self) -> FetchOutcome {
        let ticket = self.state().begin_next();
        self.run(ticket).await
    }

    /// Entry point for the rendering layer's end-of-list sentinel.
    pub async fn observe_end_of_list(
        &self,
        probe: &EndOfListProbe,
        last_visible: Option<usize>,
    ) -> FetchOutcome {
        let count = self.state().visible_items().len();
        if !probe.near_end(last_visible, count) {
            return FetchOutcome::Skipped;
        }
        self.maybe_load_next().await
    }

    /// Clear the error and re-issue the fetch for the current page.
    pub async fn retry(&self) -> FetchOutcome {
        let ticket = self.state().begin_retry();
        self.run(ticket).await
    }

    pub fn dismiss_error(&self) {
        self.state().dismiss_error();
    }

    /// Detach the view: pending responses will no longer touch the feed.
    pub fn teardown(&self) {
        self.state().close();
        tracing::debug!("Feed loader torn down");
    }

    async fn run(&self, ticket: Option<PageTicket>) -> FetchOutcome {
        let Some(ticket) = ticket else {
            return FetchOutcome::Skipped;
        };
        tracing::debug!(
            page = ticket.page_index,
            filter = %ticket.filter,
            generation = ticket.generation,
            "Fetching feed page"
        );
        let result = self
            .service
            .list_posts(ticket.query(self.options.page_size))
            .await;
        self.state()
            .complete(ticket, result, self.options.fallback.as_deref())
    }
}

impl PostTarget for FeedLoader {
    fn read_post(&self, id: &PostId) -> Option<PostSummary> {
        let state = self.state();
        if state.is_closed() {
            return None;
        }
        state.items().iter().find(|p| &p.id == id).cloned()
    }

    fn update_post(&self, id: &PostId, apply: &mut dyn FnMut(&mut PostSummary)) -> bool {
        let mut state = self.state();
        if state.is_closed() {
            return false;
        }
        let mut found = false;
        for post in state.items_mut().iter_mut().filter(|p| &p.id == id) {
            apply(post);
            found = true;
        }
        found
    }
}
