use crate::domain::Comment;
use crate::error::ServiceError;

pub(crate) const SIGN_IN_TO_COMMENT: &str = "Please log in to comment.";
pub(crate) const COMMENT_FAILED: &str = "Failed to submit comment. Please try again.";

/// The compose box of one post: its text, visibility and last error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    text: String,
    open: bool,
    error: Option<String>,
}

impl CommentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn finish(&mut self) {
        self.text.clear();
        self.open = false;
        self.error = None;
    }
}

/// How a comment submission settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// The comment was created and the post's count incremented.
    Posted(Comment),
    /// The server rejected it; the draft keeps its text and shows an error.
    Failed(ServiceError),
}
