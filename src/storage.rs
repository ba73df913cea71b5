//! Persisted key/value client state (the bearer token lives here)

use crate::config::project_dirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Key holding the bearer access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// String map persisted as JSON; an in-memory map when no file is configured.
///
/// I/O failures are logged and treated as a missing value.
#[derive(Debug, Default)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Mutex<HashMap<String, String>>,
}

impl LocalStorage {
    /// Storage file in the platform data dir
    pub fn open_default() -> Self {
        match project_dirs() {
            Some(dirs) => Self::open(dirs.data_dir().join("storage.json")),
            None => {
                warn!("No data directory available, token will not persist");
                Self::in_memory()
            }
        }
    }

    /// Load (or lazily create) a storage file
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    pub fn remove(&self, key: &str) {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map is still a valid map
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_entries(path, entries) {
            warn!("Failed to persist storage to {}: {}", path.display(), e);
        }
    }
}

fn read_entries(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    let parsed = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
    match parsed {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

fn write_entries(path: &Path, entries: &HashMap<String, String>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}
