//! Scoped persistent key-value storage
//!
//! A [`StoreProvider`] opens a store for a named scope (an application or an
//! app group shared by several processes). The returned [`KeyValueStore`]
//! reads and writes plain string values.
//!
//! Two adapters are provided:
//! - [`FileStoreProvider`] - one TOML file per scope, replaced atomically on write
//! - [`MemoryStoreProvider`] - process-local scopes, used for ephemeral hosts and tests

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tempo_core::prelude::*;

/// Opens scoped key-value stores
pub trait StoreProvider: Send + Sync {
    /// Open the store for `scope`.
    ///
    /// Fails with [`Error::StoreOpen`] when the scope is misconfigured or the
    /// backing medium is unavailable.
    fn open(&self, scope: &str) -> Result<Arc<dyn KeyValueStore>>;
}

/// String-valued key-value store for a single scope
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Check that a scope name is usable as a file stem
pub fn validate_scope(scope: &str) -> Result<()> {
    if scope.is_empty() {
        return Err(Error::store_open(scope, "scope name is empty"));
    }

    if scope == "." || scope == ".." {
        return Err(Error::store_open(scope, "scope name is reserved"));
    }

    if let Some(c) = scope
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(Error::store_open(
            scope,
            format!("invalid character {:?} in scope name", c),
        ));
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

const STORE_EXTENSION: &str = "toml";
const LOCK_EXTENSION: &str = "lock";
const CORRUPT_EXTENSION: &str = "toml.corrupt";

/// Stores each scope as `<base_dir>/<scope>.toml`
#[derive(Debug, Clone)]
pub struct FileStoreProvider {
    base_dir: PathBuf,
}

impl FileStoreProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Provider rooted at `~/.local/share/tempo/stores` (or the platform equivalent)
    pub fn default_location() -> Self {
        Self::new(default_store_directory())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Default base directory for file-backed stores
pub fn default_store_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("tempo").join("stores")
}

impl StoreProvider for FileStoreProvider {
    fn open(&self, scope: &str) -> Result<Arc<dyn KeyValueStore>> {
        validate_scope(scope)?;

        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            Error::store_open(
                scope,
                format!("cannot create {}: {}", self.base_dir.display(), e),
            )
        })?;

        if !self.base_dir.is_dir() {
            return Err(Error::store_open(
                scope,
                format!("{} is not a directory", self.base_dir.display()),
            ));
        }

        let path = self.base_dir.join(format!("{}.{}", scope, STORE_EXTENSION));
        debug!("Opened file store for scope '{}' at {:?}", scope, path);

        Ok(Arc::new(FileStore::new(&self.base_dir, path)))
    }
}

/// A single scope persisted as a flat TOML table of strings
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the store file, so readers see either the old or the new table. Writers
/// serialize on an exclusive lock of the sibling `<scope>.lock` file.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    fn new(dir: &Path, path: PathBuf) -> Self {
        Self {
            dir: dir.to_path_buf(),
            lock_path: path.with_extension(LOCK_EXTENSION),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table, `None` when the file does not exist or does not parse
    fn load(&self) -> Result<Option<toml::Table>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::store(format!(
                    "failed to read {:?}: {}",
                    self.path, e
                )))
            }
        };

        match toml::from_str(&content) {
            Ok(table) => Ok(Some(table)),
            Err(e) => {
                warn!("Corrupt store {:?}, treating as empty: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Move an unparseable store file out of the way
    fn quarantine(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let target = self.path.with_extension(CORRUPT_EXTENSION);
        std::fs::rename(&self.path, &target)
            .map_err(|e| Error::store(format!("failed to move {:?} aside: {}", self.path, e)))?;
        warn!("Moved corrupt store {:?} to {:?}", self.path, target);
        Ok(())
    }

    fn acquire_write_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| Error::store(format!("failed to open {:?}: {}", self.lock_path, e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::store(format!("failed to lock {:?}: {}", self.lock_path, e)))?;
        Ok(file)
    }

    /// Atomically replace the store file with `content`
    fn replace(&self, content: &str) -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(table) = self.load()? else {
            return Ok(None);
        };

        Ok(table
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Released when dropped
        let _lock = self.acquire_write_lock()?;

        let mut table = match self.load()? {
            Some(table) => table,
            None => {
                self.quarantine()?;
                toml::Table::new()
            }
        };
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let content = toml::to_string(&table)?;

        self.replace(&content)
            .map_err(|e| Error::store(format!("failed to write {:?}: {}", self.path, e)))?;

        trace!("Wrote key '{}' to {:?}", key, self.path);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local stores; handles opened for the same scope share values
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreProvider {
    inner: Arc<MemoryProviderInner>,
}

#[derive(Debug, Default)]
struct MemoryProviderInner {
    scopes: Mutex<HashMap<String, Arc<MemoryStore>>>,
    unavailable: AtomicBool,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose `open` always fails, modelling a misconfigured group
    pub fn unavailable() -> Self {
        let provider = Self::default();
        provider.set_available(false);
        provider
    }

    pub fn set_available(&self, available: bool) {
        self.inner.unavailable.store(!available, Ordering::SeqCst);
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn open(&self, scope: &str) -> Result<Arc<dyn KeyValueStore>> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(Error::store_open(scope, "store is unavailable"));
        }
        validate_scope(scope)?;

        let mut scopes = self.inner.scopes.lock().unwrap_or_else(|e| e.into_inner());
        let store = scopes.entry(scope.to_string()).or_default().clone();
        Ok(store)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
