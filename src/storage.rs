//! Token persistence.
//!
//! The session token is the only durable client state. It lives in a small
//! key/value backend: files under the platform data directory on native
//! targets, `window.localStorage` in the browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// Versioned key the token is written under.
pub const TOKEN_KEY: &str = "session_token_v1";

/// Keys older builds wrote the token under. Read once, then removed.
pub const LEGACY_TOKEN_KEYS: [&str; 2] = ["auth_token", "token"];

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================
// Backends
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// One file per key inside `dir`.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data_local_dir>/taskdeck/session`, or `cache/session` when the
    /// platform has no data directory.
    pub fn default_location() -> Self {
        if let Some(data_dir) = dirs::data_local_dir() {
            return Self::new(data_dir.join("taskdeck").join("session"));
        }
        Self::new(PathBuf::from("cache").join("session"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// `window.localStorage`. Looked up on every call since `web_sys::Storage`
/// cannot be shared across threads.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }
}

/// Backend used by the app when nothing else is injected.
pub fn default_store() -> Arc<dyn KeyValueStore> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(FileStore::default_location())
    }
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(LocalStorageStore)
    }
}

/// Sanitize storage key for filesystem use
#[cfg(not(target_arch = "wasm32"))]
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

// ============================================
// Token store
// ============================================

/// Cached view of the persisted session token, shared by every API client.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
    cached: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let token = load_with_migration(backend.as_ref());
        Self {
            backend,
            cached: Arc::new(RwLock::new(token)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.cached.read().ok().and_then(|token| token.clone())
    }

    pub fn is_present(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, token: &str) -> Result<(), StorageError> {
        if let Ok(mut cached) = self.cached.write() {
            *cached = Some(token.to_string());
        }
        self.backend.set(TOKEN_KEY, token)
    }

    /// Forgets the token, including anything left under the legacy keys.
    pub fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut cached) = self.cached.write() {
            *cached = None;
        }
        self.backend.delete(TOKEN_KEY)?;
        for key in LEGACY_TOKEN_KEYS {
            self.backend.delete(key)?;
        }
        Ok(())
    }
}

fn load_with_migration(backend: &dyn KeyValueStore) -> Option<String> {
    if let Some(token) = non_empty(backend.get(TOKEN_KEY)) {
        return Some(token);
    }

    let (legacy_key, token) = LEGACY_TOKEN_KEYS
        .iter()
        .find_map(|key| non_empty(backend.get(key)).map(|token| (*key, token)))?;

    info!(legacy_key, "migrating session token to {TOKEN_KEY}");
    if let Err(err) = backend.set(TOKEN_KEY, &token) {
        warn!("failed to migrate session token: {err}");
        return Some(token);
    }
    for key in LEGACY_TOKEN_KEYS {
        if let Err(err) = backend.delete(key) {
            warn!(key, "failed to remove legacy token: {err}");
        }
    }
    Some(token)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
