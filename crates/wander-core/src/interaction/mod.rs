//! Interaction reconciler - optimistic likes and confirmed comments.

mod comment;
mod like;
mod reconciler;
mod target;

pub use comment::{CommentDraft, CommentOutcome};
pub use like::{LikeCommand, LikeOutcome};
pub use reconciler::InteractionReconciler;
pub use target::PostTarget;
