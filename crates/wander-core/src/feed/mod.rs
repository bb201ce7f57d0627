//! Feed loader - the paginated, filterable list of posts of one view.

mod fallback;
mod loader;
mod state;
mod viewport;

pub use fallback::sample_posts;
pub use loader::{DEFAULT_PAGE_SIZE, FeedLoader, FeedOptions};
pub use state::{FeedFault, FeedState, FetchOutcome, PageTicket};
pub use viewport::EndOfListProbe;
