//! Scripted post service for unit tests.
//!
//! Replies are queued per operation. A reply is either ready immediately or
//! held back until the test sends it through the returned oneshot sender.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use crate::domain::{Comment, Page, PageQuery, PostId, PostSummary};
use crate::error::ServiceError;
use crate::ports::PostService;

pub(crate) fn post(id: &str, likes: u64) -> PostSummary {
    PostSummary {
        id: PostId::new(id),
        author_id: "u-1".to_string(),
        author_display_name: "Tester".to_string(),
        author_avatar_url: None,
        text: format!("post {id}"),
        image_urls: vec![format!("https://img.test/{id}.jpg")],
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        like_count: likes,
        comment_count: 0,
        liked_by_current_user: false,
    }
}

pub(crate) fn comment(id: &str, post_id: &str, text: &str) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: PostId::new(post_id),
        author_id: "u-1".to_string(),
        author_display_name: "Tester".to_string(),
        author_avatar_url: None,
        text: text.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListPosts(PageQuery),
    GetPost(PostId),
    ToggleLike(PostId),
    CreateComment(PostId, String),
    ListComments(PostId, usize),
}

type Reply<T> = Result<T, ServiceError>;

enum Scripted<T> {
    Now(Reply<T>),
    Later(oneshot::Receiver<Reply<T>>),
}

struct Queue<T>(Mutex<VecDeque<Scripted<T>>>);

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T> Queue<T> {
    fn push(&self, reply: Reply<T>) {
        self.0.lock().unwrap().push_back(Scripted::Now(reply));
    }

    fn hold(&self) -> oneshot::Sender<Reply<T>> {
        let (tx, rx) = oneshot::channel();
        self.0.lock().unwrap().push_back(Scripted::Later(rx));
        tx
    }

    async fn next(&self) -> Reply<T> {
        let scripted = self.0.lock().unwrap().pop_front();
        match scripted {
            Some(Scripted::Now(reply)) => reply,
            Some(Scripted::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ServiceError::Network("reply dropped".into()))),
            None => Err(ServiceError::Network("no scripted reply".into())),
        }
    }
}

#[derive(Default)]
pub(crate) struct ScriptedService {
    pages: Queue<Page<PostSummary>>,
    posts: Queue<PostSummary>,
    likes: Queue<()>,
    comments: Queue<Comment>,
    comment_pages: Queue<Page<Comment>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_page(&self, reply: Reply<Page<PostSummary>>) {
        self.pages.push(reply);
    }

    pub(crate) fn hold_page(&self) -> oneshot::Sender<Reply<Page<PostSummary>>> {
        self.pages.hold()
    }

    pub(crate) fn push_post(&self, reply: Reply<PostSummary>) {
        self.posts.push(reply);
    }

    pub(crate) fn hold_post(&self) -> oneshot::Sender<Reply<PostSummary>> {
        self.posts.hold()
    }

    pub(crate) fn push_like(&self, reply: Reply<()>) {
        self.likes.push(reply);
    }

    pub(crate) fn hold_like(&self) -> oneshot::Sender<Reply<()>> {
        self.likes.hold()
    }

    pub(crate) fn push_comment(&self, reply: Reply<Comment>) {
        self.comments.push(reply);
    }

    pub(crate) fn push_comment_page(&self, reply: Reply<Page<Comment>>) {
        self.comment_pages.push(reply);
    }

    pub(crate) fn hold_comment_page(&self) -> oneshot::Sender<Reply<Page<Comment>>> {
        self.comment_pages.hold()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PostService for ScriptedService {
    async fn list_posts(&self, query: PageQuery) -> Result<Page<PostSummary>, ServiceError> {
        self.record(Call::ListPosts(query));
        self.pages.next().await
    }

    async fn get_post(&self, id: &PostId) -> Result<PostSummary, ServiceError> {
        self.record(Call::GetPost(id.clone()));
        self.posts.next().await
    }

    async fn toggle_like(&self, id: &PostId) -> Result<(), ServiceError> {
        self.record(Call::ToggleLike(id.clone()));
        self.likes.next().await
    }

    async fn create_comment(&self, id: &PostId, text: &str) -> Result<Comment, ServiceError> {
        self.record(Call::CreateComment(id.clone(), text.to_string()));
        self.comments.next().await
    }

    async fn list_comments(
        &self,
        id: &PostId,
        page: usize,
        _size: usize,
    ) -> Result<Page<Comment>, ServiceError> {
        self.record(Call::ListComments(id.clone(), page));
        self.comment_pages.next().await
    }
}
