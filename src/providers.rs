//! Dioxus glue for the state containers.
//!
//! Each provider builds (or receives) a container, mirrors its observable
//! into a signal so components re-render on change, and puts both in
//! context. The `use_*` accessors panic outside their provider.

use crate::api::Services;
use crate::state::{
    ChatPanel, ChatPanelState, LayoutContext, Observable, SessionContext, SessionState,
    require_context,
};
use dioxus::prelude::*;
use std::rc::Rc;

/// Mirrors `source` into a signal for the lifetime of the calling component.
pub fn use_observable<T: Clone + 'static>(source: &Observable<T>) -> Signal<T> {
    let mirror = use_signal(|| source.get());
    let source = source.clone();
    use_hook(move || {
        Rc::new(source.subscribe(move |value: &T| {
            let mut mirror = mirror;
            mirror.set(value.clone());
        }))
    });
    mirror
}

// ============================================
// Session
// ============================================

#[derive(Clone)]
pub struct SessionHandle {
    pub context: SessionContext,
    pub state: Signal<SessionState>,
}

#[component]
pub fn SessionProvider(children: Element) -> Element {
    let services = use_context::<Services>();
    let context = use_hook(|| SessionContext::new(services.session.clone()));
    let state = use_observable(context.state());
    use_context_provider(|| SessionHandle {
        context: context.clone(),
        state,
    });

    use_hook(|| {
        let context = context.clone();
        spawn(async move {
            context.restore().await;
        })
    });

    rsx! { {children} }
}

pub fn use_session() -> SessionHandle {
    use_hook(|| {
        require_context(
            try_consume_context::<SessionHandle>(),
            "use_session",
            "SessionProvider",
        )
    })
}

// ============================================
// Layout
// ============================================

#[derive(Clone)]
pub struct LayoutHandle {
    pub context: LayoutContext,
    pub sidebar_open: Signal<bool>,
}

#[component]
pub fn LayoutProvider(children: Element) -> Element {
    let context = use_hook(LayoutContext::new);
    let sidebar_open = use_observable(context.state());
    use_context_provider(|| LayoutHandle {
        context: context.clone(),
        sidebar_open,
    });
    rsx! { {children} }
}

pub fn use_layout() -> LayoutHandle {
    use_hook(|| {
        require_context(
            try_consume_context::<LayoutHandle>(),
            "use_layout",
            "LayoutProvider",
        )
    })
}

// ============================================
// Chat
// ============================================

#[derive(Clone)]
pub struct ChatHandle {
    pub panel: ChatPanel,
    pub state: Signal<ChatPanelState>,
}

/// Owns the chat panel and keeps it pointed at the signed-in user. The
/// window is rendered here so it outlives whatever opened it.
#[component]
pub fn ChatProvider(children: Element) -> Element {
    let services = use_context::<Services>();
    let session = use_session();
    let panel = use_hook(|| {
        let panel = ChatPanel::new(services.chat.clone());
        panel.set_user(session.context.user().as_ref());
        panel
    });
    let state = use_observable(panel.state());

    use_hook(|| {
        let panel = panel.clone();
        Rc::new(
            session
                .context
                .state()
                .subscribe(move |session: &SessionState| panel.set_user(session.user.as_ref())),
        )
    });

    use_context_provider(|| ChatHandle {
        panel: panel.clone(),
        state,
    });

    rsx! {
        {children}
        crate::views::ChatWindow {}
    }
}

pub fn use_chat() -> ChatHandle {
    use_hook(|| require_context(try_consume_context::<ChatHandle>(), "use_chat", "ChatProvider"))
}
