//! Terminal front end - the rendering layer over the feed core.

mod command;
mod render;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use wander_core::Refusal;
use wander_core::detail::{CommentThread, LoadOutcome, PostDetail};
use wander_core::domain::{FeedFilter, PostId};
use wander_core::feed::{EndOfListProbe, FeedLoader, FetchOutcome};
use wander_core::interaction::{CommentDraft, CommentOutcome, InteractionReconciler, LikeOutcome};

use crate::state::AppState;

pub use command::{Command, HELP};

/// Rows shown per screen.
const WINDOW: usize = 5;

struct OpenPost {
    post: PostDetail,
    thread: CommentThread,
    interactions: InteractionReconciler,
}

impl OpenPost {
    fn close(&self) {
        self.post.teardown();
        self.thread.teardown();
    }
}

/// Drives the feed, the open post and user interactions from typed commands.
pub struct Console {
    state: AppState,
    feed: FeedLoader,
    interactions: InteractionReconciler,
    probe: EndOfListProbe,
    first_row: usize,
    open: Option<OpenPost>,
    drafts: HashMap<PostId, CommentDraft>,
}

impl Console {
    pub fn new(state: AppState) -> Self {
        let feed = FeedLoader::new(state.posts.clone(), state.feed_options.clone());
        let interactions = InteractionReconciler::new(
            state.posts.clone(),
            state.session.clone(),
            Arc::new(feed.clone()),
        );
        Self {
            probe: EndOfListProbe::new(state.prefetch_distance),
            state,
            feed,
            interactions,
            first_row: 0,
            open: None,
            drafts: HashMap::new(),
        }
    }

    /// Mount the feed and render the first screen.
    pub async fn start(&mut self) -> String {
        self.feed.mount().await;
        self.follow_viewport().await;
        self.screen()
    }

    pub async fn handle(&mut self, command: Command) -> String {
        match command {
            Command::Filter(filter) => self.switch_filter(filter).await,
            Command::Scroll => self.scroll().await,
            Command::Retry => self.retry().await,
            Command::Like(id) => {
                let note = self.like(&id).await;
                self.with_screen(note)
            }
            Command::Comment(id, text) => {
                let note = self.comment(id, text).await;
                self.with_screen(note)
            }
            Command::Open(id) => self.open(id).await,
            Command::Back => {
                self.close_post();
                self.screen()
            }
            Command::Login { username, password } => {
                let note = match self.state.auth.login(&username, &password).await {
                    Ok(user) => format!("Signed in as {}.", user.username),
                    Err(e) => format!("Login failed: {e}"),
                };
                self.remount().await;
                self.with_screen(note)
            }
            Command::Logout => {
                self.state.auth.logout().await;
                self.remount().await;
                self.with_screen("Signed out.".to_string())
            }
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        }
    }

    /// Detach every view so late responses are dropped.
    pub fn shutdown(&mut self) {
        self.close_post();
        self.feed.teardown();
    }

    async fn switch_filter(&mut self, filter: FeedFilter) -> String {
        self.close_post();
        if self.feed.set_filter(filter).await == FetchOutcome::Skipped {
            return self.with_screen(format!("Already showing {filter} posts."));
        }
        self.first_row = 0;
        self.follow_viewport().await;
        self.screen()
    }

    async fn scroll(&mut self) -> String {
        if let Some(open) = &self.open {
            open.thread.load_more().await;
            return self.screen();
        }
        let count = self.feed.view().visible_items().len();
        if self.first_row + WINDOW < count {
            self.first_row += WINDOW;
        }
        self.follow_viewport().await;
        self.screen()
    }

    /// Let the end-of-list sentinel request the next page if it is on screen.
    async fn follow_viewport(&self) {
        let count = self.feed.view().visible_items().len();
        let last_visible = (count > 0).then(|| (self.first_row + WINDOW - 1).min(count - 1));
        let outcome = self.feed.observe_end_of_list(&self.probe, last_visible).await;
        tracing::debug!(first_row = self.first_row, ?outcome, "Viewport observed");
    }

    async fn retry(&mut self) -> String {
        if let Some(open) = &self.open {
            if open.post.error().is_some() {
                open.post.load().await;
            }
            if open.thread.view().error.is_some() {
                open.thread.retry().await;
            }
            return self.screen();
        }
        self.feed.retry().await;
        self.follow_viewport().await;
        self.screen()
    }

    fn interactions_for(&self, id: &PostId) -> &InteractionReconciler {
        match &self.open {
            Some(open) if open.post.id() == id => &open.interactions,
            _ => &self.interactions,
        }
    }

    async fn like(&self, id: &PostId) -> String {
        match self.interactions_for(id).like(id).await {
            Ok(LikeOutcome::Confirmed { state }) if state.liked => {
                format!("Liked {id} ({} likes).", state.like_count)
            }
            Ok(LikeOutcome::Confirmed { state }) => {
                format!("Removed like from {id} ({} likes).", state.like_count)
            }
            Ok(LikeOutcome::RolledBack { error, .. }) => {
                format!("Could not update like: {}", error.user_message())
            }
            Err(Refusal::NotAuthenticated) => "Please log in to like posts.".to_string(),
            Err(refusal) => refusal.to_string(),
        }
    }

    async fn comment(&mut self, id: PostId, text: String) -> String {
        let mut draft = self.drafts.remove(&id).unwrap_or_default();
        draft.open();
        if !text.is_empty() {
            draft.set_text(text);
        }

        let result = self.interactions_for(&id).submit_comment(&id, &mut draft).await;
        let note = match &result {
            Ok(CommentOutcome::Posted(_)) => "Comment posted.".to_string(),
            Ok(CommentOutcome::Failed(_)) => format!(
                "{} Type 'comment {id}' to resend.",
                draft.error().unwrap_or_default()
            ),
            Err(Refusal::EmptyComment) => "Write something first.".to_string(),
            Err(Refusal::NotAuthenticated) => draft.error().unwrap_or_default().to_string(),
            Err(refusal) => refusal.to_string(),
        };

        if matches!(result, Ok(CommentOutcome::Posted(_))) {
            if let Some(open) = self.open.as_ref().filter(|open| open.post.id() == &id) {
                open.thread.reload().await;
            }
        } else {
            self.drafts.insert(id, draft);
        }
        note
    }

    async fn open(&mut self, id: PostId) -> String {
        self.close_post();
        let post = PostDetail::new(self.state.posts.clone(), id.clone());
        let open = OpenPost {
            thread: CommentThread::new(self.state.posts.clone(), id),
            interactions: InteractionReconciler::new(
                self.state.posts.clone(),
                self.state.session.clone(),
                Arc::new(post.clone()),
            ),
            post,
        };
        let (loaded, _) = tokio::join!(open.post.load(), open.thread.mount());
        if let LoadOutcome::Failed(message) = &loaded {
            tracing::debug!(post_id = %open.post.id(), %message, "Post detail unavailable");
        }
        self.open = Some(open);
        self.screen()
    }

    fn close_post(&mut self) {
        if let Some(open) = self.open.take() {
            open.close();
        }
    }

    /// Start a fresh feed session, e.g. after the signed-in user changed.
    async fn remount(&mut self) {
        self.close_post();
        let filter = self.feed.filter();
        self.feed.teardown();
        self.feed = FeedLoader::with_filter(
            self.state.posts.clone(),
            self.state.feed_options.clone(),
            filter,
        );
        self.interactions = InteractionReconciler::new(
            self.state.posts.clone(),
            self.state.session.clone(),
            Arc::new(self.feed.clone()),
        );
        self.first_row = 0;
        self.feed.mount().await;
        self.follow_viewport().await;
    }

    fn with_screen(&self, note: String) -> String {
        format!("{note}\n{}", self.screen())
    }

    fn screen(&self) -> String {
        let now = Utc::now();
        let mut out = match &self.open {
            Some(open) => render::detail(
                open.post.post().as_ref(),
                open.post.error().as_deref(),
                &open.thread.view(),
                now,
            ),
            None => render::feed(
                &self.feed.view(),
                self.first_row,
                self.first_row + WINDOW - 1,
                now,
            ),
        };
        let who = match self.state.session.current_user() {
            Some(user) => format!("signed in as {}", user.username),
            None => "not signed in".to_string(),
        };
        out.push_str(&format!("({who})"));
        out
    }
}
