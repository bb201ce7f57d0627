//! Domain entities - the feed's core objects.

mod comment;
mod filter;
mod page;
mod post;

pub use comment::Comment;
pub use filter::FeedFilter;
pub use page::{Page, PageQuery};
pub use post::{LikeSnapshot, PostId, PostSummary};
