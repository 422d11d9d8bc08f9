use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub body_class: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            body_class: "theme-dark",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            body_class: "theme-light",
        },
        ThemeMode::System => ThemeDefinition {
            css: SYSTEM_THEME,
            body_class: "theme-system",
        },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #111827;
    --color-bg-secondary: #1f2937;
    --color-bg-overlay: rgba(0, 0, 0, 0.5);
    --color-text-primary: #ffffff;
    --color-text-muted: #9ca3af;
    --color-border: #374151;
    --color-card-bg: #1f2937;
    --color-input-bg: #111827;
    --color-chat-user-bg: #3b82f6;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #374151;
    --color-chat-assistant-text: #ffffff;
    --color-error-bg: rgba(127, 29, 29, 0.2);
    --color-error-text: #fca5a5;
}
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #f9fafb;
    --color-bg-secondary: #ffffff;
    --color-bg-overlay: rgba(0, 0, 0, 0.5);
    --color-text-primary: #1f2937;
    --color-text-muted: #4b5563;
    --color-border: #e5e7eb;
    --color-card-bg: #ffffff;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #3b82f6;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #e5e7eb;
    --color-chat-assistant-text: #1f2937;
    --color-error-bg: #fef2f2;
    --color-error-text: #b91c1c;
}
"#;

const SYSTEM_THEME: &str = r#"
:root {
    --color-bg-primary: #f9fafb;
    --color-bg-secondary: #ffffff;
    --color-bg-overlay: rgba(0, 0, 0, 0.5);
    --color-text-primary: #1f2937;
    --color-text-muted: #4b5563;
    --color-border: #e5e7eb;
    --color-card-bg: #ffffff;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #3b82f6;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #e5e7eb;
    --color-chat-assistant-text: #1f2937;
    --color-error-bg: #fef2f2;
    --color-error-text: #b91c1c;
}
@media (prefers-color-scheme: dark) {
    :root {
        --color-bg-primary: #111827;
        --color-bg-secondary: #1f2937;
        --color-text-primary: #ffffff;
        --color-text-muted: #9ca3af;
        --color-border: #374151;
        --color-card-bg: #1f2937;
        --color-input-bg: #111827;
        --color-chat-assistant-bg: #374151;
        --color-chat-assistant-text: #ffffff;
        --color-error-bg: rgba(127, 29, 29, 0.2);
        --color-error-text: #fca5a5;
    }
}
"#;
