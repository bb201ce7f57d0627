//! Paged list state shared by the feed and comment threads.
//!
//! Every fetch is started with [`PagedState::begin`] (or one of its wrappers),
//! which hands out a [`PageCursor`] tagged with the current generation. The
//! response is merged with [`PagedState::complete`], which drops it if the list
//! was reset or closed in the meantime.

use crate::domain::Page;
use crate::error::ServiceError;

/// Identity of one in-flight page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub generation: u64,
    pub page_index: usize,
}

/// A recorded page load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFault {
    pub page_index: usize,
    /// Banner text.
    pub message: String,
    pub cause: ServiceError,
}

/// What happened to a fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the list.
    Loaded { page_index: usize, received: usize },
    /// The request failed; the fault is recorded on the state.
    Failed(FeedFault),
    /// Nothing was requested (guard closed, nothing more to load, unchanged filter).
    Skipped,
    /// The response arrived for a superseded session and was dropped.
    Stale,
}

/// Items of a paginated listing plus its single fetch slot.
#[derive(Debug, Clone)]
pub struct PagedState<T> {
    items: Vec<T>,
    page_index: usize,
    loaded_through: Option<usize>,
    has_more: bool,
    in_flight: Option<PageCursor>,
    error: Option<FeedFault>,
    generation: u64,
    closed: bool,
}

impl<T> Default for PagedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_index: 0,
            loaded_through: None,
            has_more: true,
            in_flight: None,
            error: None,
            generation: 0,
            closed: false,
        }
    }
}

impl<T> PagedState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&FeedFault> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Start over from an empty list, abandoning any outstanding fetch.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.page_index = 0;
        self.loaded_through = None;
        self.has_more = true;
        self.in_flight = None;
        self.error = None;
    }

    /// Abandon any outstanding fetch and claim page 0 again.
    ///
    /// Items stay visible until the first page replaces them.
    pub fn refresh(&mut self) -> Option<PageCursor> {
        self.generation += 1;
        self.in_flight = None;
        self.loaded_through = None;
        self.has_more = true;
        self.error = None;
        self.begin(0)
    }

    /// Claim the single fetch slot for `page_index`.
    pub fn begin(&mut self, page_index: usize) -> Option<PageCursor> {
        if self.closed || self.in_flight.is_some() {
            return None;
        }
        let cursor = PageCursor {
            generation: self.generation,
            page_index,
        };
        self.page_index = page_index;
        self.in_flight = Some(cursor);
        Some(cursor)
    }

    /// Claim the first page if nothing was loaded yet.
    pub fn begin_initial(&mut self) -> Option<PageCursor> {
        if self.loaded_through.is_some() || self.error.is_some() {
            return None;
        }
        self.begin(0)
    }

    /// Claim the page after the last loaded one, if the list can advance.
    pub fn begin_next(&mut self) -> Option<PageCursor> {
        if !self.has_more || self.error.is_some() {
            return None;
        }
        let next = self.loaded_through.map_or(0, |page| page + 1);
        self.begin(next)
    }

    /// Clear the error and claim the page that failed.
    ///
    /// Without a recorded error only a list that never loaded can be retried;
    /// a loaded page is never requested twice.
    pub fn begin_retry(&mut self) -> Option<PageCursor> {
        if self.closed || self.in_flight.is_some() {
            return None;
        }
        if self.error.is_none() && self.loaded_through.is_some() {
            return None;
        }
        self.error = None;
        self.begin(self.page_index)
    }

    /// Whether a response for `cursor` may still be merged.
    pub fn accepts(&self, cursor: PageCursor) -> bool {
        !self.closed && self.in_flight == Some(cursor)
    }

    /// Merge the response for `cursor`. `describe` turns a failure into banner text.
    pub fn complete(
        &mut self,
        cursor: PageCursor,
        result: Result<Page<T>, ServiceError>,
        describe: impl FnOnce(&ServiceError) -> String,
    ) -> FetchOutcome {
        if !self.accepts(cursor) {
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let received = page.items.len();
                if cursor.page_index == 0 {
                    self.items = page.items;
                } else {
                    self.items.extend(page.items);
                }
                self.has_more = page.has_next;
                self.loaded_through = Some(cursor.page_index);
                self.error = None;
                FetchOutcome::Loaded {
                    page_index: cursor.page_index,
                    received,
                }
            }
            Err(cause) => {
                let fault = FeedFault {
                    page_index: cursor.page_index,
                    message: describe(&cause),
                    cause,
                };
                self.error = Some(fault.clone());
                FetchOutcome::Failed(fault)
            }
        }
    }

    /// Hide the error banner without retrying.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Stop accepting responses; the owning view is gone.
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
    }
}
