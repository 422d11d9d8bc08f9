#![cfg(not(target_arch = "wasm32"))]

use serde_json::json;
use std::sync::Arc;
use taskdeck::api::{ApiClient, SessionService, TaskService};
use taskdeck::state::SessionContext;
use taskdeck::storage::{KeyValueStore, MemoryStore, TOKEN_KEY, TokenStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> serde_json::Value {
    json!({
        "id": "usr_7",
        "email": "ada@example.com",
        "name": "Ada",
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn client(server: &MockServer, tokens: TokenStore) -> ApiClient {
    ApiClient::new(format!("{}/api", server.uri()), tokens)
}

#[tokio::test]
async fn login_stores_token_and_authorizes_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/signin"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(), "token": "tok" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = Arc::new(MemoryStore::new());
    let tokens = TokenStore::new(backend.clone());
    let api = client(&server, tokens.clone());
    let session = SessionContext::new(SessionService::new(api.clone()));

    let user = session.login("  ada@example.com ", "hunter2").await.unwrap();
    assert_eq!(user.display_name(), "Ada");
    assert!(session.is_authenticated());
    assert_eq!(tokens.token().as_deref(), Some("tok"));
    assert_eq!(backend.get(TOKEN_KEY).as_deref(), Some("tok"));

    let tasks = TaskService::new(api).list().await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/signin"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let tokens = TokenStore::in_memory();
    let session = SessionContext::new(SessionService::new(client(&server, tokens.clone())));

    let err = session.login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    assert!(tokens.token().is_none());
}

#[tokio::test]
async fn restore_loads_profile_for_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    let tokens = TokenStore::in_memory();
    tokens.set("stored").unwrap();
    let session = SessionContext::new(SessionService::new(client(&server, tokens)));
    assert!(session.snapshot().loading);

    session.restore().await;

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.user.map(|u| u.email), Some("ada@example.com".to_string()));
}

#[tokio::test]
async fn restore_with_rejected_token_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .mount(&server)
        .await;

    let backend = Arc::new(MemoryStore::new());
    backend.set("auth_token", "stale").unwrap();
    let tokens = TokenStore::new(backend.clone());
    assert_eq!(tokens.token().as_deref(), Some("stale"));

    let session = SessionContext::new(SessionService::new(client(&server, tokens.clone())));
    session.restore().await;

    let state = session.snapshot();
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert!(tokens.token().is_none());
    assert!(backend.get(TOKEN_KEY).is_none());
    assert!(backend.get("auth_token").is_none());
}

#[tokio::test]
async fn restore_without_token_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionContext::new(SessionService::new(client(&server, TokenStore::in_memory())));
    session.restore().await;

    let state = session.snapshot();
    assert!(!state.loading);
    assert!(!state.is_authenticated());
}

#[tokio::test]
async fn logout_notifies_subscribers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "pw", "name": "Ada" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(), "token": "fresh" })),
        )
        .mount(&server)
        .await;

    let tokens = TokenStore::in_memory();
    let session = SessionContext::new(SessionService::new(client(&server, tokens.clone())));
    session.signup("ada@example.com", "pw", " Ada ").await.unwrap();

    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = session
        .state()
        .subscribe(move |state| sink.borrow_mut().push(state.is_authenticated()));

    session.logout();

    assert_eq!(*seen.borrow(), vec![false]);
    assert!(tokens.token().is_none());
}

#[tokio::test]
async fn restore_signs_out_when_profile_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = TokenStore::in_memory();
    tokens.set("tok").unwrap();

    let session = SessionContext::new(SessionService::new(client(&server, tokens.clone())));
    session.restore().await;

    let state = session.snapshot();
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert!(tokens.token().is_none());
}
