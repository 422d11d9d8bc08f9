use crate::providers::use_session;
use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScreen {
    Login,
    Signup,
}

#[component]
pub fn LoginView(screen: Signal<AuthScreen>) -> Element {
    let mut screen = screen;
    let session = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |ev: FormEvent| {
        ev.prevent_default();
        if submitting() {
            return;
        }
        let session = session.clone();
        let (email_value, password_value) = (email(), password());
        error.set(None);
        submitting.set(true);
        spawn(async move {
            // On success the session switches screens and this view goes away.
            if let Err(err) = session.context.login(&email_value, &password_value).await {
                error.set(Some(err.to_string()));
                submitting.set(false);
            }
        });
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { class: "auth-title", "Welcome Back" }
                p { class: "text-muted", "Sign in to your account" }
                ErrorBanner { error: error() }
                form { class: "auth-form", onsubmit: onsubmit,
                    label { r#for: "email", "Email" }
                    input {
                        id: "email", r#type: "email", required: true, placeholder: "you@example.com",
                        value: "{email}", oninput: move |ev| email.set(ev.value()),
                    }
                    label { r#for: "password", "Password" }
                    input {
                        id: "password", r#type: "password", required: true,
                        value: "{password}", oninput: move |ev| password.set(ev.value()),
                    }
                    button { class: "btn btn-primary", r#type: "submit", disabled: submitting(),
                        if submitting() { "Signing in..." } else { "Sign in" }
                    }
                }
                p { class: "auth-switch",
                    "Don't have an account? "
                    button { class: "link", r#type: "button", onclick: move |_| screen.set(AuthScreen::Signup), "Sign up" }
                }
            }
        }
    }
}

#[component]
pub fn SignupView(screen: Signal<AuthScreen>) -> Element {
    let mut screen = screen;
    let session = use_session();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |ev: FormEvent| {
        ev.prevent_default();
        if submitting() {
            return;
        }
        let session = session.clone();
        let (name_value, email_value, password_value) = (name(), email(), password());
        error.set(None);
        submitting.set(true);
        spawn(async move {
            if let Err(err) = session
                .context
                .signup(&email_value, &password_value, &name_value)
                .await
            {
                error.set(Some(err.to_string()));
                submitting.set(false);
            }
        });
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { class: "auth-title", "Create Account" }
                p { class: "text-muted", "Start organizing your tasks" }
                ErrorBanner { error: error() }
                form { class: "auth-form", onsubmit: onsubmit,
                    label { r#for: "name", "Name" }
                    input {
                        id: "name", r#type: "text", required: true,
                        value: "{name}", oninput: move |ev| name.set(ev.value()),
                    }
                    label { r#for: "email", "Email" }
                    input {
                        id: "email", r#type: "email", required: true, placeholder: "you@example.com",
                        value: "{email}", oninput: move |ev| email.set(ev.value()),
                    }
                    label { r#for: "password", "Password" }
                    input {
                        id: "password", r#type: "password", required: true,
                        value: "{password}", oninput: move |ev| password.set(ev.value()),
                    }
                    button { class: "btn btn-primary", r#type: "submit", disabled: submitting(),
                        if submitting() { "Creating account..." } else { "Sign up" }
                    }
                }
                p { class: "auth-switch",
                    "Already have an account? "
                    button { class: "link", r#type: "button", onclick: move |_| screen.set(AuthScreen::Login), "Sign in" }
                }
            }
        }
    }
}

#[component]
pub fn ErrorBanner(error: Option<String>) -> Element {
    match error {
        Some(message) => rsx! { div { class: "error-banner", role: "alert", "{message}" } },
        None => rsx! {},
    }
}
