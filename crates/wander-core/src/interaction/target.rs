use crate::domain::{PostId, PostSummary};

/// A view holding mutable copies of posts: the feed list or a detail page.
///
/// The reconciler locates posts through this trait by identity. Each view
/// owns its own copies, so a mutation in one does not reach the other.
pub trait PostTarget: Send + Sync {
    /// Current displayed copy of the post, if this view shows it and is still open.
    fn read_post(&self, id: &PostId) -> Option<PostSummary>;

    /// Apply `apply` to every displayed copy of the post. Returns `false` if none,
    /// or if the view was torn down.
    fn update_post(&self, id: &PostId, apply: &mut dyn FnMut(&mut PostSummary)) -> bool;
}
