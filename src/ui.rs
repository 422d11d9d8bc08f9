use crate::api::Services;
use crate::config;
use crate::providers::{ChatProvider, LayoutProvider, SessionProvider, use_session};
use crate::storage::{TokenStore, default_store};
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{AuthScreen, DashboardShell, LoginView, SignupView};
use dioxus::prelude::*;

const TASKDECK_CSS: Asset = asset!("/assets/taskdeck.css");

#[component]
pub fn App() -> Element {
    use_context_provider(|| {
        let tokens = TokenStore::new(default_store());
        Services::new(&config::current(), tokens)
    });

    rsx! {
        document::Link { rel: "stylesheet", href: TASKDECK_CSS }
        SessionProvider { Shell {} }
    }
}

#[component]
fn Shell() -> Element {
    let session = use_session();
    let screen = use_signal(|| AuthScreen::Login);
    let state = (session.state)();
    let theme = state
        .user
        .as_ref()
        .and_then(|user| user.theme())
        .unwrap_or_default();
    let body_class = theme_definition(theme).body_class;

    rsx! {
        ThemeStyles { theme }
        div { class: "app-root {body_class}",
            if state.loading {
                LoadingScreen {}
            } else if state.is_authenticated() {
                LayoutProvider {
                    ChatProvider { DashboardShell {} }
                }
            } else if screen() == AuthScreen::Signup {
                SignupView { screen }
            } else {
                LoginView { screen }
            }
        }
    }
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn LoadingScreen() -> Element {
    rsx! {
        div { class: "loading-screen",
            div { class: "spinner" }
            p { class: "text-muted", "Loading dashboard..." }
        }
    }
}
