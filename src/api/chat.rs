use super::client::ApiClient;
use super::error::ApiResult;
use crate::types::{ChatMessage, ChatReply, Conversation, parse_timestamp};
use serde::Serialize;
use std::cmp::Ordering;

/// Prefix the backend puts on user ids (`usr_15`); chat routes want `15`.
pub const USER_ID_PREFIX: &str = "usr_";

/// Messages starting with this are internal tool invocations.
pub const TOOL_CALL_PREFIX: &str = "Tool call:";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

pub fn normalize_user_id(user_id: &str) -> &str {
    user_id.strip_prefix(USER_ID_PREFIX).unwrap_or(user_id)
}

pub fn is_tool_call(message: &ChatMessage) -> bool {
    message.content.starts_with(TOOL_CALL_PREFIX)
}

/// Most recently updated conversation. Unparseable timestamps lose.
pub fn latest_conversation(conversations: &[Conversation]) -> Option<&Conversation> {
    conversations.iter().max_by(|a, b| {
        match (
            parse_timestamp(&a.updated_at),
            parse_timestamp(&b.updated_at),
        ) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    })
}

/// Client for the conversational backend.
#[derive(Clone)]
pub struct ChatService {
    client: ApiClient,
}

impl ChatService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn conversations(&self, user_id: &str) -> ApiResult<Vec<Conversation>> {
        let user_id = normalize_user_id(user_id);
        self.client
            .get(&format!("/api/{user_id}/conversations"))
            .await
    }

    pub async fn messages(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> ApiResult<Vec<ChatMessage>> {
        let user_id = normalize_user_id(user_id);
        self.client
            .get(&format!(
                "/api/{user_id}/conversations/{conversation_id}/messages"
            ))
            .await
    }

    /// Posts a message, continuing `conversation_id` when given.
    pub async fn send(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> ApiResult<ChatReply> {
        let user_id = normalize_user_id(user_id);
        self.client
            .post(
                &format!("/api/{user_id}/chat"),
                &ChatRequest {
                    message,
                    conversation_id,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: &str, updated_at: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            title: None,
            created_at: None,
            updated_at: updated_at.to_string(),
            is_active: Some(true),
        }
    }

    #[test]
    fn strips_only_the_leading_prefix() {
        assert_eq!(normalize_user_id("usr_15"), "15");
        assert_eq!(normalize_user_id("15"), "15");
        assert_eq!(normalize_user_id("abc_usr_1"), "abc_usr_1");
    }

    #[test]
    fn resumes_most_recent_conversation() {
        let list = vec![
            conversation("1", "2024-05-01T09:00:00"),
            conversation("2", "2024-05-02T09:00:00"),
        ];
        assert_eq!(latest_conversation(&list).unwrap().id, "2");

        let reversed: Vec<_> = list.into_iter().rev().collect();
        assert_eq!(latest_conversation(&reversed).unwrap().id, "2");
    }

    #[test]
    fn unparseable_timestamps_sort_last() {
        let list = vec![
            conversation("9", "not a date"),
            conversation("3", "2023-01-01T00:00:00+00:00"),
        ];
        assert_eq!(latest_conversation(&list).unwrap().id, "3");
        assert!(latest_conversation(&[]).is_none());
    }

    #[test]
    fn tool_call_detection_is_prefix_only() {
        let msg = |content: &str| ChatMessage {
            id: String::new(),
            role: crate::types::Role::Assistant,
            content: content.to_string(),
            timestamp: String::new(),
        };
        assert!(is_tool_call(&msg("Tool call: add_task({})")));
        assert!(!is_tool_call(&msg("I made a Tool call: earlier")));
        assert!(!is_tool_call(&msg("tool call: lowercase")));
    }
}
