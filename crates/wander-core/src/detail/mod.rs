//! Single-post view: the post itself and its comment thread.

mod post;
mod thread;

pub use post::{LoadOutcome, PostDetail};
pub use thread::{COMMENT_PAGE_SIZE, CommentThread, ThreadView};
