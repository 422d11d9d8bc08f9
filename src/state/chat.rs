use super::observable::Observable;
use crate::api::chat::{is_tool_call, latest_conversation, normalize_user_id};
use crate::api::{ApiResult, ChatService};
use crate::types::{ChatMessage, Role, User, now_timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

static MESSAGE_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_message_id(prefix: &str) -> String {
    let n = MESSAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}

fn assistant_message(prefix: &str, content: String, timestamp: String) -> ChatMessage {
    ChatMessage {
        id: next_message_id(prefix),
        role: Role::Assistant,
        content,
        timestamp,
    }
}

fn welcome_message() -> ChatMessage {
    assistant_message("welcome", WELCOME_MESSAGE.to_string(), now_timestamp())
}

pub fn error_reply_text(err: &impl std::fmt::Display) -> String {
    format!("Sorry, I encountered an error: {err}. Please check that the backend is running.")
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatPanelState {
    pub open: bool,
    /// Numeric user id used in chat routes.
    pub user_id: Option<String>,
    /// Everything fetched or exchanged, tool-call entries included.
    pub messages: Vec<ChatMessage>,
    pub conversation_id: Option<String>,
    pub loading: bool,
}

impl ChatPanelState {
    /// The transcript as shown: tool-call entries are hidden.
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|msg| !is_tool_call(msg))
    }
}

/// The floating assistant panel. Never fails outward: every backend error
/// ends up in the transcript.
#[derive(Clone)]
pub struct ChatPanel {
    service: ChatService,
    state: Observable<ChatPanelState>,
}

impl ChatPanel {
    pub fn new(service: ChatService) -> Self {
        Self {
            service,
            state: Observable::new(ChatPanelState::default()),
        }
    }

    pub fn state(&self) -> &Observable<ChatPanelState> {
        &self.state
    }

    pub fn snapshot(&self) -> ChatPanelState {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state.with(|s| s.open)
    }

    /// Follows the signed-in user. A different user starts from a clean
    /// panel; signing out also closes it.
    pub fn set_user(&self, user: Option<&User>) {
        let next = user.map(|u| normalize_user_id(&u.id).to_string());
        self.state.update(|s| {
            if s.user_id == next {
                return;
            }
            s.user_id = next;
            s.messages.clear();
            s.conversation_id = None;
            s.loading = false;
            if s.user_id.is_none() {
                s.open = false;
            }
        });
    }

    /// Opens the panel and resumes the latest conversation. Does nothing
    /// without a user.
    pub async fn open(&self) -> bool {
        let has_user = self.state.update(|s| {
            if s.user_id.is_some() {
                s.open = true;
            }
            s.user_id.is_some()
        });
        if has_user {
            self.load_latest().await;
        }
        has_user
    }

    pub async fn open_for(&self, user: &User) -> bool {
        self.set_user(Some(user));
        self.open().await
    }

    pub fn close(&self) {
        self.state.update(|s| s.open = false);
    }

    pub async fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open().await;
        }
    }

    /// Replaces the transcript with the most recently updated conversation,
    /// or a welcome message when there is none or it cannot be loaded.
    pub async fn load_latest(&self) {
        let Some(user_id) = self.state.with(|s| s.user_id.clone()) else {
            return;
        };
        self.state.update(|s| s.loading = true);

        let loaded = self.fetch_latest(&user_id).await;

        self.state.update(|s| {
            if s.user_id.as_deref() != Some(user_id.as_str()) {
                debug!("discarding conversation for a previous user");
                return;
            }
            s.loading = false;
            match loaded {
                Ok(Some((conversation_id, messages))) => {
                    s.messages = messages;
                    s.conversation_id = Some(conversation_id);
                }
                Ok(None) => {
                    s.messages = vec![welcome_message()];
                    s.conversation_id = None;
                }
                Err(err) => {
                    warn!("failed to load conversation: {err}");
                    s.messages = vec![welcome_message()];
                }
            }
        });
    }

    async fn fetch_latest(&self, user_id: &str) -> ApiResult<Option<(String, Vec<ChatMessage>)>> {
        let conversations = self.service.conversations(user_id).await?;
        let Some(latest) = latest_conversation(&conversations) else {
            return Ok(None);
        };
        let mut messages = self.service.messages(user_id, &latest.id).await?;
        for message in messages.iter_mut().filter(|m| m.id.is_empty()) {
            message.id = next_message_id("msg");
        }
        Ok(Some((latest.id.clone(), messages)))
    }

    /// Sends `text` and appends the reply. Returns false when nothing was
    /// sent (blank input, no user, or a request already in flight).
    pub async fn send(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let outgoing = self.state.update(|s| {
            if s.loading {
                return None;
            }
            let user_id = s.user_id.clone()?;
            s.messages.push(ChatMessage {
                id: next_message_id("msg"),
                role: Role::User,
                content: text.to_string(),
                timestamp: now_timestamp(),
            });
            s.loading = true;
            Some((user_id, s.conversation_id.clone()))
        });
        let Some((user_id, conversation_id)) = outgoing else {
            return false;
        };

        let result = self
            .service
            .send(&user_id, text, conversation_id.as_deref())
            .await;

        self.state.update(|s| {
            if s.user_id.as_deref() != Some(user_id.as_str()) {
                debug!("discarding chat reply for a previous user");
                return;
            }
            s.loading = false;
            match result {
                Ok(reply) => {
                    if !reply.conversation_id.is_empty() {
                        s.conversation_id = Some(reply.conversation_id);
                    }
                    let timestamp = if reply.timestamp.is_empty() {
                        now_timestamp()
                    } else {
                        reply.timestamp
                    };
                    s.messages
                        .push(assistant_message("resp", reply.response, timestamp));
                }
                Err(err) => {
                    warn!("chat request failed: {err}");
                    s.messages.push(assistant_message(
                        "error",
                        error_reply_text(&err),
                        now_timestamp(),
                    ));
                }
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> ChatMessage {
        ChatMessage {
            id: next_message_id("msg"),
            role: Role::Assistant,
            content: content.to_string(),
            timestamp: String::new(),
        }
    }

    #[test]
    fn tool_calls_hidden_but_kept() {
        let state = ChatPanelState {
            messages: vec![
                message("Tool call: add_task"),
                message("Added your task."),
            ],
            ..Default::default()
        };
        let visible: Vec<_> = state.visible_messages().map(|m| m.content.as_str()).collect();
        assert_eq!(visible, vec!["Added your task."]);
        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn message_ids_are_unique() {
        let a = next_message_id("msg");
        let b = next_message_id("msg");
        assert_ne!(a, b);
        assert!(a.starts_with("msg-"));
    }

    #[test]
    fn error_text_mentions_backend() {
        let text = error_reply_text(&"API request failed: 500");
        assert_eq!(
            text,
            "Sorry, I encountered an error: API request failed: 500. Please check that the backend is running."
        );
    }
}
