/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "taskdeck=info";

/// Installs the global subscriber. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

// The browser build logs through the renderer's console logger.
#[cfg(target_arch = "wasm32")]
pub fn init() {}
