// Key-value storage backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value capability the persisted store writes through.
///
/// Values are opaque serialized strings; callers decide the format. A missing
/// key reads as `None`, never as an error.
pub trait StorageBackend {
    /// Read the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed storage: one `<key>.json` file per key
///
/// The backing files live in a `.taskpad` subdirectory of the given path.
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    /// Open or create a storage directory at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".taskpad");

        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;

        Ok(Self { base_path })
    }

    /// Get the base path of this backend
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(eyre!("Storage key cannot be empty"));
        }
        if key.len() > 64 {
            return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
        }
        if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(eyre!(
                "Invalid storage key: {} (must be alphanumeric with _/-)",
                key
            ));
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;

        let path = self.entry_path(key);
        if !path.exists() {
            debug!(key, "no storage entry on disk");
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).context("Failed to read storage entry")?;
        Ok(Some(raw))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        let path = self.entry_path(key);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .context("Failed to open storage entry for writing")?;

        // Acquire exclusive lock before overwriting
        file.lock_exclusive().context("Failed to acquire file lock")?;

        file.set_len(0)?;

        use std::io::Write;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, as if a previous session had written it.
    pub fn seed(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Raw stored value under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
