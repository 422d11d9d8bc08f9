#![cfg(not(target_arch = "wasm32"))]

use serde_json::json;
use taskdeck::api::{ApiClient, ChatService};
use taskdeck::state::ChatPanel;
use taskdeck::state::chat::WELCOME_MESSAGE;
use taskdeck::storage::TokenStore;
use taskdeck::types::{Role, User};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> User {
    serde_json::from_value(json!({ "id": "usr_7", "email": "ada@example.com", "name": "Ada" }))
        .unwrap()
}

fn panel(server: &MockServer) -> ChatPanel {
    let client = ApiClient::new(server.uri(), TokenStore::in_memory());
    let panel = ChatPanel::new(ChatService::new(client));
    panel.set_user(Some(&user()));
    panel
}

fn visible(panel: &ChatPanel) -> Vec<String> {
    panel
        .snapshot()
        .visible_messages()
        .map(|m| m.content.clone())
        .collect()
}

#[tokio::test]
async fn opening_resumes_most_recent_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "old", "updated_at": "2024-01-01T09:00:00" },
            { "id": 2, "title": "new", "updated_at": "2024-03-01T09:00:00" },
            { "id": 3, "title": "broken", "updated_at": "not a date" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations/2/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "role": "user", "content": "add milk", "timestamp": "2024-03-01T09:00:00" },
            { "role": "assistant", "content": "Tool call: add_task", "timestamp": "2024-03-01T09:00:01" },
            { "role": "assistant", "content": "Added milk.", "timestamp": "2024-03-01T09:00:02" }
        ])))
        .mount(&server)
        .await;

    let panel = panel(&server);
    assert!(panel.open().await);

    let state = panel.snapshot();
    assert!(state.open);
    assert!(!state.loading);
    assert_eq!(state.conversation_id.as_deref(), Some("2"));
    assert_eq!(state.messages.len(), 3);
    assert_eq!(visible(&panel), vec!["add milk", "Added milk."]);
    assert!(state.messages.iter().all(|m| !m.id.is_empty()));
}

#[tokio::test]
async fn no_conversations_shows_welcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let panel = panel(&server);
    panel.open().await;

    let state = panel.snapshot();
    assert!(state.conversation_id.is_none());
    assert_eq!(visible(&panel), vec![WELCOME_MESSAGE]);
    assert_eq!(state.messages[0].role, Role::Assistant);
}

#[tokio::test]
async fn load_failure_shows_welcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let panel = panel(&server);
    panel.open().await;

    assert_eq!(visible(&panel), vec![WELCOME_MESSAGE]);
    assert!(!panel.snapshot().loading);
}

#[tokio::test]
async fn send_appends_reply_and_continues_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/7/chat"))
        .and(body_json(json!({ "message": "list my tasks" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": 42,
            "response": "You have **2** tasks.",
            "tool_calls": null,
            "timestamp": "2024-03-01T09:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/7/chat"))
        .and(body_json(json!({ "message": "thanks", "conversation_id": "42" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "42",
            "response": "Any time.",
            "tool_calls": [{ "name": "noop", "arguments": {} }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel(&server);
    assert!(panel.send("  list my tasks ").await);
    assert_eq!(panel.snapshot().conversation_id.as_deref(), Some("42"));
    assert!(panel.send("thanks").await);

    let state = panel.snapshot();
    let roles: Vec<Role> = state.messages.iter().map(|m| m.role.clone()).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(
        visible(&panel),
        vec!["list my tasks", "You have **2** tasks.", "thanks", "Any time."]
    );
    assert!(!state.messages[3].timestamp.is_empty());
}

#[tokio::test]
async fn send_failure_becomes_transcript_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/7/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "model offline" })))
        .mount(&server)
        .await;

    let panel = panel(&server);
    assert!(panel.send("hello").await);

    let state = panel.snapshot();
    assert!(!state.loading);
    let last = state.messages.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(
        last.content,
        "Sorry, I encountered an error: model offline. Please check that the backend is running."
    );
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/7/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let panel = panel(&server);
    assert!(!panel.send("   ").await);
    assert!(panel.snapshot().messages.is_empty());
}

#[tokio::test]
async fn signing_out_closes_and_clears_the_panel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let panel = panel(&server);
    panel.open().await;
    assert!(panel.is_open());

    panel.set_user(None);

    let state = panel.snapshot();
    assert!(!state.open);
    assert!(state.messages.is_empty());
    assert!(state.user_id.is_none());
    assert!(!panel.open().await);
}

#[tokio::test]
async fn reply_for_a_previous_user_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/7/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "conversation_id": 99,
                    "response": "only for user 7",
                    "tool_calls": []
                }))
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let panel = panel(&server);
    let next_user: User =
        serde_json::from_value(json!({ "id": "usr_8", "email": "bob@example.com" })).unwrap();

    let (sent, ()) = tokio::join!(panel.send("hi"), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        panel.set_user(Some(&next_user));
    });

    assert!(sent);
    let state = panel.snapshot();
    assert_eq!(state.user_id.as_deref(), Some("8"));
    assert!(state.conversation_id.is_none());
    assert!(state.messages.is_empty());
    assert!(!state.loading);
}

#[tokio::test]
async fn open_for_switches_user_and_loads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/8/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let panel = panel(&server);
    let other: User =
        serde_json::from_value(json!({ "id": "usr_8", "email": "bob@example.com" })).unwrap();

    assert!(panel.open_for(&other).await);

    let state = panel.snapshot();
    assert!(state.open);
    assert_eq!(state.user_id.as_deref(), Some("8"));
    assert_eq!(visible(&panel), vec![WELCOME_MESSAGE]);
}

#[tokio::test]
async fn toggle_opens_then_closes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/7/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let panel = panel(&server);
    panel.toggle().await;
    assert!(panel.is_open());
    panel.toggle().await;
    assert!(!panel.is_open());
    assert_eq!(visible(&panel), vec![WELCOME_MESSAGE]);
}
