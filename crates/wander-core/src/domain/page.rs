use super::FeedFilter;

/// Parameters of one page request against a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub size: usize,
    pub filter: FeedFilter,
}

impl PageQuery {
    pub fn new(page: usize, size: usize, filter: FeedFilter) -> Self {
        Self { page, size, filter }
    }
}

/// One page of a paginated listing, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub has_previous: bool,
    pub total_pages: usize,
    pub total_elements: usize,
    pub current_page: usize,
}

impl<T> Page<T> {
    /// A page with only the continuation flag known.
    pub fn new(items: Vec<T>, has_next: bool) -> Self {
        Self {
            items,
            has_next,
            has_previous: false,
            total_pages: 0,
            total_elements: 0,
            current_page: 0,
        }
    }

    pub fn at(mut self, current_page: usize) -> Self {
        self.current_page = current_page;
        self.has_previous = current_page > 0;
        self
    }
}
