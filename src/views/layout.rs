use crate::providers::{use_layout, use_session};
use crate::views::{ChatLauncher, DashboardView};
use dioxus::prelude::*;

#[component]
pub fn DashboardShell() -> Element {
    rsx! {
        div { class: "shell",
            Sidebar {}
            div { class: "shell-main",
                Header {}
                main { class: "shell-content", DashboardView {} }
            }
            ChatLauncher {}
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let layout = use_layout();
    let session = use_session();
    let open = (layout.sidebar_open)();
    let sidebar_class = if open { "sidebar open" } else { "sidebar" };
    let name = session
        .state
        .with(|s| s.user.as_ref().map(|u| u.display_name().to_string()))
        .unwrap_or_default();

    let overlay_layout = layout.context.clone();
    let nav_layout = layout.context.clone();
    let logout_layout = layout.context.clone();
    let on_logout = move |_: MouseEvent| {
        logout_layout.close_sidebar();
        session.context.logout();
    };

    rsx! {
        if open {
            div {
                class: "sidebar-overlay",
                onclick: move |_| overlay_layout.close_sidebar(),
            }
        }
        aside { class: sidebar_class,
            div { class: "sidebar-header",
                h1 { class: "sidebar-title", "Todo App" }
                p { class: "text-muted", "Welcome back," }
                p { class: "sidebar-user", "{name}" }
            }
            nav { class: "sidebar-nav",
                button {
                    class: "nav-item active",
                    onclick: move |_| nav_layout.close_sidebar(),
                    "Dashboard"
                }
            }
            div { class: "sidebar-footer",
                button { class: "btn btn-secondary", onclick: on_logout, "Logout" }
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let layout = use_layout();
    let session = use_session();
    let user = session.state.with(|s| s.user.clone());
    let (initial, name) = match user.as_ref() {
        Some(user) => (user.initial(), user.display_name().to_string()),
        None => ('U', String::new()),
    };

    rsx! {
        header { class: "app-header",
            button {
                class: "icon-btn menu-btn",
                aria_label: "Open menu",
                onclick: move |_| layout.context.open_sidebar(),
                "☰"
            }
            h1 { class: "header-title", "Dashboard" }
            div { class: "header-user",
                span { class: "avatar", "{initial}" }
                span { class: "header-name", "{name}" }
            }
        }
    }
}
