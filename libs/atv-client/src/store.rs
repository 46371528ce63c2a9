//! Persistent key-value storage for the session.
//!
//! The session only ever needs `get`/`set`/`remove` on string keys, so the
//! backing store is a small trait object injected at context construction.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key-value store failures
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no local data directory available on this platform")]
    NoDataDir,
}

/// Synchronous string key-value store.
///
/// `remove` of a missing key succeeds.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    /// Returns [`StoreError`] when the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    /// Returns [`StoreError`] when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Returns [`StoreError`] when the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// JSON-object file store.
///
/// The whole map is cached in memory and rewritten on every change through a
/// temp file in the same directory, then renamed over the target.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A file that is not a JSON object of strings is treated as empty and
    /// overwritten on the next change.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if an existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupted store file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Store scoped to an API origin under the user's local data directory,
    /// e.g. `~/.local/share/atv-rental/atvrental.muccs.site.json`.
    ///
    /// # Errors
    /// Returns `StoreError::NoDataDir` when the platform has no data dir,
    /// or an I/O error from [`open`](Self::open).
    pub fn for_origin(api_base_url: &str) -> Result<Self, StoreError> {
        let base = dirs::data_local_dir().ok_or(StoreError::NoDataDir)?;
        Self::open(base.join("atv-rental").join(origin_file_name(api_base_url)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

/// File name for an origin: host and port with anything unusual replaced.
fn origin_file_name(api_base_url: &str) -> String {
    let host = url::Url::parse(api_base_url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|h| u.port().map_or_else(|| h.to_owned(), |p| format!("{h}_{p}")))
        })
        .unwrap_or_else(|| "default".to_owned());
    let safe: String = host
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.json")
}
