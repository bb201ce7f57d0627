use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::comment::{COMMENT_FAILED, CommentDraft, CommentOutcome, SIGN_IN_TO_COMMENT};
use super::like::{LikeCommand, LikeLedger, LikeOutcome};
use super::target::PostTarget;
use crate::domain::{LikeSnapshot, PostId};
use crate::error::Refusal;
use crate::ports::PostService;
use crate::session::SessionContext;

/// Applies likes and comments to the posts of one view and syncs them with the server.
pub struct InteractionReconciler {
    service: Arc<dyn PostService>,
    session: SessionContext,
    target: Arc<dyn PostTarget>,
    ledgers: Mutex<HashMap<PostId, LikeLedger>>,
    sequence: AtomicU64,
}

impl InteractionReconciler {
    pub fn new(
        service: Arc<dyn PostService>,
        session: SessionContext,
        target: Arc<dyn PostTarget>,
    ) -> Self {
        Self {
            service,
            session,
            target,
            ledgers: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    fn ledgers(&self) -> MutexGuard<'_, HashMap<PostId, LikeLedger>> {
        self.ledgers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Toggle the current user's like on a post.
    ///
    /// The toggle is displayed immediately and undone if the server rejects it.
    /// Refused without any change when nobody is signed in.
    pub async fn like(&self, post_id: &PostId) -> Result<LikeOutcome, Refusal> {
        if !self.session.is_authenticated() {
            tracing::debug!(post_id = %post_id, "Like refused: not signed in");
            return Err(Refusal::NotAuthenticated);
        }

        let command = self.apply_like(post_id)?;
        tracing::debug!(
            post_id = %post_id,
            sequence = command.sequence,
            liked = command.after.liked,
            "Optimistic like applied"
        );

        match self.service.toggle_like(post_id).await {
            Ok(()) => {
                let state = self.settle(&command, LikeLedger::confirm);
                Ok(LikeOutcome::Confirmed { state })
            }
            Err(error) => {
                tracing::warn!(
                    post_id = %post_id,
                    sequence = command.sequence,
                    error = %error,
                    "Like failed, rolling back"
                );
                let state = self.settle(&command, LikeLedger::reject);
                Ok(LikeOutcome::RolledBack { state, error })
            }
        }
    }

    fn apply_like(&self, post_id: &PostId) -> Result<LikeCommand, Refusal> {
        let mut ledgers = self.ledgers();
        let shown = self
            .target
            .read_post(post_id)
            .ok_or_else(|| Refusal::UnknownPost(post_id.clone()))?
            .like_snapshot();

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let ledger = ledgers
            .entry(post_id.clone())
            .or_insert_with(|| LikeLedger::new(shown));
        let command = ledger.begin(post_id.clone(), sequence, shown);
        if !self.display(post_id, command.after) {
            ledgers.remove(post_id);
            return Err(Refusal::UnknownPost(post_id.clone()));
        }
        Ok(command)
    }

    fn settle(
        &self,
        command: &LikeCommand,
        resolve: fn(&mut LikeLedger, &LikeCommand) -> LikeSnapshot,
    ) -> LikeSnapshot {
        let mut ledgers = self.ledgers();
        let Some(ledger) = ledgers.get_mut(&command.post_id) else {
            return command.before;
        };
        let state = resolve(ledger, command);
        let settled = ledger.is_settled();
        // A view that no longer shows the post keeps no ledger for it.
        if !self.display(&command.post_id, state) || settled {
            ledgers.remove(&command.post_id);
        }
        state
    }

    fn display(&self, post_id: &PostId, state: LikeSnapshot) -> bool {
        self.target
            .update_post(post_id, &mut |post| post.apply_like_snapshot(state))
    }

    /// Submit the draft as a comment on a post.
    ///
    /// Whitespace-only text is ignored. The comment count only changes once
    /// the server has accepted the comment.
    pub async fn submit_comment(
        &self,
        post_id: &PostId,
        draft: &mut CommentDraft,
    ) -> Result<CommentOutcome, Refusal> {
        let text = draft.text().trim().to_string();
        if text.is_empty() {
            return Err(Refusal::EmptyComment);
        }
        if !self.session.is_authenticated() {
            draft.fail(SIGN_IN_TO_COMMENT);
            return Err(Refusal::NotAuthenticated);
        }
        if self.target.read_post(post_id).is_none() {
            return Err(Refusal::UnknownPost(post_id.clone()));
        }

        draft.clear_error();
        match self.service.create_comment(post_id, &text).await {
            Ok(comment) => {
                self.target
                    .update_post(post_id, &mut |post| post.comment_count += 1);
                draft.finish();
                tracing::debug!(post_id = %post_id, comment_id = %comment.id, "Comment posted");
                Ok(CommentOutcome::Posted(comment))
            }
            Err(error) => {
                tracing::warn!(post_id = %post_id, error = %error, "Comment failed");
                draft.fail(COMMENT_FAILED);
                Ok(CommentOutcome::Failed(error))
            }
        }
    }
}
