//! Feed page state - the synchronous half of the feed loader.
//!
//! Pagination itself lives in [`PagedState`]; this layer adds the active
//! filter and the development fallback shown when the first page fails.

use crate::domain::{FeedFilter, Page, PageQuery, PostSummary};
use crate::error::ServiceError;
use crate::paging::{PageCursor, PagedState};

pub use crate::paging::{FeedFault, FetchOutcome};

/// Identity of one in-flight page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page_index: usize,
    pub filter: FeedFilter,
}

impl PageTicket {
    pub fn query(&self, page_size: usize) -> PageQuery {
        PageQuery::new(self.page_index, page_size, self.filter)
    }

    fn cursor(&self) -> PageCursor {
        PageCursor {
            generation: self.generation,
            page_index: self.page_index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedState {
    pages: PagedState<PostSummary>,
    filter: FeedFilter,
    fallback: Option<Vec<PostSummary>>,
}

impl FeedState {
    pub fn new(filter: FeedFilter) -> Self {
        Self {
            pages: PagedState::new(),
            filter,
            fallback: None,
        }
    }

    pub fn items(&self) -> &[PostSummary] {
        self.pages.items()
    }

    pub fn items_mut(&mut self) -> &mut [PostSummary] {
        self.pages.items_mut()
    }

    /// Items to render: the development fallback while it is active, otherwise `items`.
    pub fn visible_items(&self) -> &[PostSummary] {
        self.fallback.as_deref().unwrap_or(self.pages.items())
    }

    pub fn is_showing_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn filter(&self) -> FeedFilter {
        self.filter
    }

    pub fn page_index(&self) -> usize {
        self.pages.page_index()
    }

    pub fn has_more(&self) -> bool {
        self.pages.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.pages.is_loading()
    }

    pub fn error(&self) -> Option<&FeedFault> {
        self.pages.error()
    }

    pub fn generation(&self) -> u64 {
        self.pages.generation()
    }

    pub fn is_closed(&self) -> bool {
        self.pages.is_closed()
    }

    /// Start a new feed session under `filter`, abandoning any outstanding fetch.
    pub fn reset(&mut self, filter: FeedFilter) {
        self.pages.reset();
        self.filter = filter;
        self.fallback = None;
        tracing::debug!(filter = %filter, generation = self.generation(), "Feed session reset");
    }

    /// Switch filters. Returns `false` when the filter is unchanged.
    pub fn set_filter(&mut self, filter: FeedFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.reset(filter);
        true
    }

    fn ticket(&self, cursor: Option<PageCursor>) -> Option<PageTicket> {
        cursor.map(|cursor| PageTicket {
            generation: cursor.generation,
            page_index: cursor.page_index,
            filter: self.filter,
        })
    }

    /// Claim the single fetch slot for `page_index` under the active filter.
    pub fn begin(&mut self, page_index: usize) -> Option<PageTicket> {
        let cursor = self.pages.begin(page_index);
        self.ticket(cursor)
    }

    /// Claim the first page of the session if nothing was loaded yet.
    pub fn begin_initial(&mut self) -> Option<PageTicket> {
        let cursor = self.pages.begin_initial();
        self.ticket(cursor)
    }

    /// Claim the page after the last loaded one, if the feed can advance.
    pub fn begin_next(&mut self) -> Option<PageTicket> {
        let cursor = self.pages.begin_next();
        self.ticket(cursor)
    }

    /// Clear the error and claim the page that failed.
    ///
    /// A feed whose pages all loaded has nothing to retry.
    pub fn begin_retry(&mut self) -> Option<PageTicket> {
        let cursor = self.pages.begin_retry();
        self.ticket(cursor)
    }

    /// Merge the response for `ticket`.
    ///
    /// `fallback` is shown in place of an empty feed when the fetch fails.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Page<PostSummary>, ServiceError>,
        fallback: Option<&[PostSummary]>,
    ) -> FetchOutcome {
        if ticket.filter != self.filter || !self.pages.accepts(ticket.cursor()) {
            tracing::debug!(
                page = ticket.page_index,
                filter = %ticket.filter,
                generation = ticket.generation,
                current_generation = self.generation(),
                "Discarding stale feed response"
            );
            return FetchOutcome::Stale;
        }

        let outcome = self
            .pages
            .complete(ticket.cursor(), result, ServiceError::user_message);
        match &outcome {
            FetchOutcome::Loaded { received, .. } => {
                self.fallback = None;
                tracing::debug!(
                    page = ticket.page_index,
                    filter = %ticket.filter,
                    received,
                    has_more = self.has_more(),
                    "Feed page merged"
                );
            }
            FetchOutcome::Failed(fault) => {
                tracing::warn!(
                    page = ticket.page_index,
                    filter = %ticket.filter,
                    error = %fault.cause,
                    "Feed page failed to load"
                );
                if let Some(sample) = fallback.filter(|_| self.pages.items().is_empty()) {
                    let mut sample = sample.to_vec();
                    self.filter.sort(&mut sample);
                    self.fallback = Some(sample);
                }
            }
            FetchOutcome::Skipped | FetchOutcome::Stale => {}
        }
        outcome
    }

    /// Hide the error banner without retrying.
    pub fn dismiss_error(&mut self) {
        self.pages.dismiss_error();
    }

    /// Stop accepting responses; the owning view is gone.
    pub fn close(&mut self) {
        self.pages.close();
    }
}
