//! Application state containers.
//!
//! One container per concern (session, layout, tasks, chat). Each owns an
//! [`Observable`] snapshot and the service it drives. The view layer puts
//! the containers in context and mirrors their snapshots into signals; all
//! of the logic here runs without a renderer.

pub mod chat;
pub mod layout;
pub mod observable;
pub mod session;
pub mod tasks;

pub use chat::{ChatPanel, ChatPanelState};
pub use layout::LayoutContext;
pub use observable::{Observable, Subscription};
pub use session::{SessionContext, SessionState};
pub use tasks::{TaskBoard, TaskBoardState};

/// Unwraps a context lookup made by an accessor hook. A missing provider is
/// a wiring bug, so this panics with a fixed message.
#[track_caller]
pub fn require_context<T>(found: Option<T>, accessor: &str, provider: &str) -> T {
    match found {
        Some(value) => value,
        None => panic!("{accessor} must be used within a {provider}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_context_is_returned() {
        assert_eq!(require_context(Some(3), "use_layout", "LayoutProvider"), 3);
    }

    #[test]
    #[should_panic(expected = "use_session must be used within a SessionProvider")]
    fn missing_session_provider_panics() {
        require_context::<SessionContext>(None, "use_session", "SessionProvider");
    }

    #[test]
    #[should_panic(expected = "use_chat must be used within a ChatProvider")]
    fn missing_chat_provider_panics() {
        require_context::<ChatPanel>(None, "use_chat", "ChatProvider");
    }
}
