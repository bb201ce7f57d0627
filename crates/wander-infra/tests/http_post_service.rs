//! HTTP adapter tests against a mock posts API.

#![cfg(feature = "http")]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wander_core::domain::{FeedFilter, PageQuery, PostId};
use wander_core::feed::{EndOfListProbe, FeedLoader, FeedOptions, FetchOutcome};
use wander_core::ports::{AuthError, AuthService, CredentialStore, PostService, Registration};
use wander_core::{CurrentUser, ServiceError, SessionContext};
use wander_infra::{ApiClient, ApiConfig, HttpAuthClient, HttpPostService, InMemoryCredentialStore};

fn post_json(id: &str, likes: u64) -> Value {
    json!({
        "id": id,
        "userId": "u1",
        "text": format!("post {id}"),
        "createdAt": "2024-05-01T12:00:00Z",
        "imageUrls": [format!("https://img.test/{id}.jpg")],
        "likeCount": likes,
        "commentCount": 2,
        "username": "sarah",
        "profileImageUrl": null,
        "likedByCurrentUser": false
    })
}

fn page_json(posts: Vec<Value>, page: usize, has_next: bool) -> Value {
    json!({
        "posts": posts,
        "totalPages": 2,
        "totalElements": 3,
        "currentPage": page,
        "hasNext": has_next,
        "hasPrevious": page > 0
    })
}

fn client(server: &MockServer, session: SessionContext) -> ApiClient {
    ApiClient::new(&ApiConfig::new(server.uri()), session).unwrap()
}

#[tokio::test]
async fn test_list_posts_sends_filter_flags_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(query_param("isPopular", "true"))
        .and(query_param("isNew", "false"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![post_json("p1", 9), post_json("p2", 4)], 0, true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionContext::signed_in(CurrentUser::new("sarah", "tok-1"));
    let service = HttpPostService::new(client(&server, session));
    let page = service
        .list_posts(PageQuery::new(0, 10, FeedFilter::Popular))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page.has_next);
    assert_eq!(page.total_elements, 3);
    let first = &page.items[0];
    assert_eq!(first.id, PostId::new("p1"));
    assert_eq!(first.author_display_name, "sarah");
    assert_eq!(first.cover_image(), Some("https://img.test/p1.jpg"));
    assert_eq!(first.like_count, 9);
}

#[tokio::test]
async fn test_get_post_reads_nested_author() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/p7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p7",
            "userId": "u3",
            "text": "Kyoto in spring",
            "createdAt": "2024-04-02T08:30:00Z",
            "imageUrls": [],
            "likeCount": 12,
            "commentCount": 0,
            "likedByCurrentUser": true,
            "author": { "username": "mike", "profileImageUrl": "https://img.test/mike.png" }
        })))
        .mount(&server)
        .await;

    let service = HttpPostService::new(client(&server, SessionContext::anonymous()));
    let post = service.get_post(&PostId::new("p7")).await.unwrap();
    assert_eq!(post.author_display_name, "mike");
    assert_eq!(post.author_avatar_url.as_deref(), Some("https://img.test/mike.png"));
    assert!(post.liked_by_current_user);
    assert_eq!(post.cover_image(), None);
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = HttpPostService::new(client(&server, SessionContext::anonymous()));
    assert_eq!(
        service.get_post(&PostId::new("gone")).await,
        Err(ServiceError::NotFound)
    );
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/p1/comments"))
        .and(body_json(json!({ "text": "Lovely" })))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Comment too short" })),
        )
        .mount(&server)
        .await;

    let session = SessionContext::signed_in(CurrentUser::new("sarah", "tok-1"));
    let service = HttpPostService::new(client(&server, session));
    assert_eq!(
        service.create_comment(&PostId::new("p1"), "Lovely").await,
        Err(ServiceError::Status {
            status: 422,
            message: "Comment too short".to_string()
        })
    );
}

#[tokio::test]
async fn test_create_comment_and_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/p1/comments"))
        .and(body_json(json!({ "text": "Lovely" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "c9",
            "userId": "u1",
            "text": "Lovely",
            "createdAt": "2024-05-02T10:00:00Z",
            "user": { "username": "sarah", "profileImageUrl": null }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts/p1/comments"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [{
                "id": "c1",
                "userId": "u2",
                "content": "First!",
                "createdAt": "2024-05-01T10:00:00Z"
            }],
            "hasNext": false,
            "hasPrevious": true,
            "currentPage": 1
        })))
        .mount(&server)
        .await;

    let session = SessionContext::signed_in(CurrentUser::new("sarah", "tok-1"));
    let service = HttpPostService::new(client(&server, session));
    let id = PostId::new("p1");

    let created = service.create_comment(&id, "Lovely").await.unwrap();
    assert_eq!(created.id, "c9");
    assert_eq!(created.post_id, id);
    assert_eq!(created.author_display_name, "sarah");

    let page = service.list_comments(&id, 1, 10).await.unwrap();
    assert_eq!(page.items[0].text, "First!");
    assert_eq!(page.items[0].author_display_name, "Unknown User");
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_unauthorized_signs_out_and_clears_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/p1/like"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let user = CurrentUser::new("sarah", "expired");
    let session = SessionContext::signed_in(user.clone());
    let store = Arc::new(InMemoryCredentialStore::with_user(user));
    let service =
        HttpPostService::new(client(&server, session.clone()).with_credentials(store.clone()));

    assert_eq!(
        service.toggle_like(&PostId::new("p1")).await,
        Err(ServiceError::Unauthorized)
    );
    assert!(!session.is_authenticated());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![], 0, false))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig::new(server.uri()).with_timeout(Duration::from_millis(100));
    let service =
        HttpPostService::new(ApiClient::new(&config, SessionContext::anonymous()).unwrap());
    assert_eq!(
        service
            .list_posts(PageQuery::new(0, 10, FeedFilter::Latest))
            .await,
        Err(ServiceError::Timeout)
    );
}

#[tokio::test]
async fn test_feed_pages_until_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![post_json("p1", 1), post_json("p2", 1)], 0, true)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![post_json("p3", 1)], 1, false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = Arc::new(HttpPostService::new(client(&server, SessionContext::anonymous())));
    let feed = FeedLoader::new(service, FeedOptions::default().with_page_size(2));
    let probe = EndOfListProbe::default();

    feed.mount().await;
    assert_eq!(
        feed.observe_end_of_list(&probe, Some(1)).await,
        FetchOutcome::Loaded {
            page_index: 1,
            received: 1
        }
    );
    assert_eq!(
        feed.observe_end_of_list(&probe, Some(2)).await,
        FetchOutcome::Skipped
    );

    let ids: Vec<String> = feed.items().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    assert!(!feed.view().has_more());
}

#[tokio::test]
async fn test_login_strips_quotes_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "username": "sarah", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"jwt.token.value\""))
        .mount(&server)
        .await;

    let session = SessionContext::anonymous();
    let store = Arc::new(InMemoryCredentialStore::new());
    let auth = HttpAuthClient::new(client(&server, session.clone()).with_credentials(store.clone()));

    let user = auth.login("sarah", "secret1").await.unwrap();
    assert_eq!(user.token, "jwt.token.value");
    assert_eq!(session.bearer_token().as_deref(), Some("jwt.token.value"));
    assert_eq!(store.load().await.unwrap(), Some(user));

    auth.logout().await;
    assert!(!session.is_authenticated());
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_login_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = SessionContext::anonymous();
    let auth = HttpAuthClient::new(client(&server, session.clone()));

    assert!(matches!(
        auth.login("sarah", "abc").await,
        Err(AuthError::Validation(_))
    ));
    assert!(matches!(
        auth.login("sarah", "wrong-password").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(!session.is_authenticated());
    // only the second attempt reached the server
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "u42",
            "username": "nora",
            "token": "fresh-token"
        })))
        .mount(&server)
        .await;

    let session = SessionContext::anonymous();
    let auth = HttpAuthClient::new(client(&server, session.clone()));
    let user = auth
        .register(&Registration {
            username: "nora".to_string(),
            email: "nora@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id.as_deref(), Some("u42"));
    assert_eq!(session.current_user(), Some(user));
}
