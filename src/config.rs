use anyhow::{Result, bail};
use once_cell::sync::OnceCell;
#[cfg(not(target_arch = "wasm32"))]
use std::env;

pub const API_URL_VAR: &str = "TASKDECK_API_URL";
pub const CHAT_URL_VAR: &str = "TASKDECK_CHAT_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8000";

/// Bundled config for builds without a `.env` (wasm, mobile)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

static INSTALLED: OnceCell<AppConfig> = OnceCell::new();

/// Base URLs for the backends. Fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Task and auth API, e.g. `https://host/api`.
    pub api_url: String,
    /// Chat backend root; routes are appended as `/api/{user}/...`.
    pub chat_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
        }
    }
}

impl AppConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Self::from_layers(|key| env::var(key).ok(), BUNDLED_CONFIG)
    }

    /// The browser has no process environment. Values exported while
    /// building win over the bundled file.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Result<Self> {
        Self::from_layers(|key| build_time_value(key).map(str::to_string), BUNDLED_CONFIG)
    }

    /// `primary` first, then the `KEY=value` lines in `bundled`.
    pub fn from_layers(primary: impl Fn(&str) -> Option<String>, bundled: &str) -> Result<Self> {
        let bundled = parse_env_lines(bundled);
        Self::from_lookup(|key| {
            primary(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| {
                    bundled
                        .iter()
                        .find(|(name, _)| *name == key)
                        .map(|(_, value)| value.to_string())
                })
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str, default: &str| -> Result<String> {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string());
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("{key} must be an http(s) URL, got {value:?}");
            }
            Ok(value.trim_end_matches('/').to_string())
        };

        Ok(Self {
            api_url: read(API_URL_VAR, DEFAULT_API_URL)?,
            chat_url: read(CHAT_URL_VAR, DEFAULT_CHAT_URL)?,
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn build_time_value(key: &str) -> Option<&'static str> {
    match key {
        API_URL_VAR => option_env!("TASKDECK_API_URL"),
        CHAT_URL_VAR => option_env!("TASKDECK_CHAT_URL"),
        _ => None,
    }
}

/// Makes `config` the one returned by [`current`]. Later calls are ignored.
pub fn install(config: AppConfig) {
    let _ = INSTALLED.set(config);
}

pub fn current() -> AppConfig {
    INSTALLED.get().cloned().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {}

#[cfg(not(target_arch = "wasm32"))]
fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}
