use crate::providers::{use_chat, use_session};
use crate::state::ChatPanel;
use crate::types::{ChatMessage, Role};
use crate::views::shared::{format_message_time, markdown_to_html};
use dioxus::events::Key;
use dioxus::prelude::*;
use tracing::warn;

/// Floating button that opens or closes the assistant.
#[component]
pub fn ChatLauncher() -> Element {
    let chat = use_chat();
    let session = use_session();
    let open = chat.state.with(|s| s.open);
    let label = if open { "Close assistant" } else { "Open assistant" };

    rsx! {
        button {
            class: "chat-launcher",
            aria_label: label,
            onclick: move |_| {
                let panel = chat.panel.clone();
                if panel.is_open() {
                    panel.close();
                    return;
                }
                let Some(user) = session.state.read().user.clone() else {
                    return;
                };
                spawn(async move {
                    panel.open_for(&user).await;
                });
            },
            if open { "×" } else { "AI" }
        }
    }
}

fn submit(panel: &ChatPanel, mut input: Signal<String>) {
    let text = input();
    if text.trim().is_empty() || panel.state().with(|s| s.loading) {
        return;
    }
    input.set(String::new());
    let panel = panel.clone();
    spawn(async move {
        panel.send(&text).await;
    });
}

/// Stays mounted under the chat provider so a reply in flight still lands
/// after the window is closed.
#[component]
pub fn ChatWindow() -> Element {
    let chat = use_chat();
    let mut input = use_signal(String::new);

    let snapshot = (chat.state)();
    if !snapshot.open {
        return rsx! {};
    }

    let close_panel = chat.panel.clone();
    let key_panel = chat.panel.clone();
    let click_panel = chat.panel.clone();
    let can_send = !snapshot.loading && !input().trim().is_empty();

    rsx! {
        div { class: "chat-window", role: "dialog", aria_label: "AI Assistant",
            div { class: "chat-header",
                h2 { "AI Assistant" }
                button {
                    class: "icon-btn",
                    aria_label: "Close chat",
                    onclick: move |_| close_panel.close(),
                    "×"
                }
            }
            div { class: "chat-transcript",
                for message in snapshot.visible_messages() {
                    MessageBubble { key: "{message.id}", message: message.clone() }
                }
                if snapshot.loading {
                    div { class: "message-row assistant",
                        div { class: "typing-indicator",
                            span {}
                            span {}
                            span {}
                        }
                    }
                }
            }
            div { class: "chat-composer",
                textarea {
                    rows: "2",
                    placeholder: "Ask me to add, list or complete tasks...",
                    value: "{input}",
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            submit(&key_panel, input);
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !can_send,
                    onclick: move |_| submit(&click_panel, input),
                    "Send"
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> Element {
    let side = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let time = format_message_time(&message.timestamp);

    rsx! {
        div { class: "message-row {side}",
            div { class: "bubble {side}",
                if message.role == Role::Assistant {
                    AssistantContent { content: message.content.clone() }
                } else {
                    "{message.content}"
                }
            }
            if let Some(time) = time {
                span { class: "message-timestamp", "{time}" }
            }
        }
    }
}

#[component]
fn AssistantContent(content: String) -> Element {
    let html = markdown_to_html(&content);
    let on_copy = move |_: MouseEvent| copy_to_clipboard(&content);

    rsx! {
        div { class: "bubble-controls",
            button { class: "action-btn", title: "Copy", onclick: on_copy, "Copy" }
        }
        div { class: "md", dangerous_inner_html: "{html}" }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn copy_to_clipboard(text: &str) {
    let result =
        arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()));
    if let Err(err) = result {
        warn!("clipboard unavailable: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
fn copy_to_clipboard(text: &str) {
    match serde_json::to_string(text) {
        Ok(literal) => {
            document::eval(&format!("navigator.clipboard.writeText({literal});"));
        }
        Err(err) => warn!("could not encode clipboard text: {err}"),
    }
}
