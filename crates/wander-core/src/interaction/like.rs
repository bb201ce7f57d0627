//! Like commands and the per-post ledger that reconciles them.
//!
//! A like is a reversible command: it records the snapshot displayed before
//! it ran and the snapshot it displayed. The ledger keeps the last confirmed
//! snapshot of the post plus the commands still waiting for the server; what
//! is displayed is always the confirmed snapshot with the pending toggles
//! applied. A lone command that fails therefore puts back exactly the
//! snapshot it captured, and overlapping commands each settle only their own
//! toggle.

use crate::domain::{LikeSnapshot, PostId};
use crate::error::ServiceError;

/// One optimistic like toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeCommand {
    pub post_id: PostId,
    pub sequence: u64,
    pub before: LikeSnapshot,
    pub after: LikeSnapshot,
}

/// How a like invocation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The server accepted the toggle; `state` is now authoritative.
    Confirmed { state: LikeSnapshot },
    /// The server rejected the toggle and it was undone.
    RolledBack {
        state: LikeSnapshot,
        error: ServiceError,
    },
}

impl LikeOutcome {
    pub fn state(&self) -> LikeSnapshot {
        match self {
            LikeOutcome::Confirmed { state } | LikeOutcome::RolledBack { state, .. } => *state,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LikeLedger {
    confirmed: LikeSnapshot,
    pending: Vec<u64>,
}

impl LikeLedger {
    pub(crate) fn new(confirmed: LikeSnapshot) -> Self {
        Self {
            confirmed,
            pending: Vec::new(),
        }
    }

    pub(crate) fn displayed(&self) -> LikeSnapshot {
        if self.pending.len() % 2 == 1 {
            self.confirmed.toggled()
        } else {
            self.confirmed
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Record a new optimistic toggle on top of `shown`, the currently displayed state.
    pub(crate) fn begin(&mut self, post_id: PostId, sequence: u64, shown: LikeSnapshot) -> LikeCommand {
        if self.is_settled() {
            // Nothing in flight: whatever is displayed is the last known server state.
            self.confirmed = shown;
        }
        let before = self.displayed();
        self.pending.push(sequence);
        LikeCommand {
            post_id,
            sequence,
            before,
            after: self.displayed(),
        }
    }

    pub(crate) fn confirm(&mut self, command: &LikeCommand) -> LikeSnapshot {
        if self.remove(command.sequence) {
            self.confirmed = self.confirmed.toggled();
        }
        self.displayed()
    }

    pub(crate) fn reject(&mut self, command: &LikeCommand) -> LikeSnapshot {
        self.remove(command.sequence);
        self.displayed()
    }

    fn remove(&mut self, sequence: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| *s != sequence);
        self.pending.len() != before
    }
}
