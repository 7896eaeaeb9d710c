//! Shared configuration store
//!
//! The configured defaults live in one JSON document per working directory so
//! that separate invocations of the tool see the same values. Every read and
//! write happens under a [`ScopedLock`]: the process-wide mutex first, then an
//! advisory lock on `provider-config.json.lock` next to the document.

mod lock;
mod snapshot;

pub use lock::{ProcessGuard, ScopedLock};
pub use snapshot::{ConfigurationSnapshot, SnapshotError};

pub(crate) use snapshot::is_valid_component_name;

use std::fs::{self, DirBuilder};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::Builder;
use thiserror::Error;
use tracing::{debug, info};

/// File name of the persisted snapshot
pub const CONFIG_FILE_NAME: &str = "provider-config.json";
/// Directory created under the working directory to hold the snapshot
pub const STORE_DIR_NAME: &str = ".resourcenamingtool";

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Errors from the configuration store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("timeout waiting for lock on {} after {timeout:?}", path.display())]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },

    #[error("{} holds {actual} bytes after write, expected {expected}", path.display())]
    VerifyMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

impl StoreError {
    pub fn summary(&self) -> &'static str {
        match self {
            StoreError::CreateDir { .. } => "Directory Creation Failed",
            StoreError::LockTimeout { .. } => "Lock Timeout",
            StoreError::Lock { .. } => "Lock Failed",
            StoreError::Read { .. } => "Read Failed",
            StoreError::Write { .. } => "Write Failed",
            StoreError::Serialize(_) => "Serialization Failed",
            StoreError::Decode { .. } => "Deserialization Failed",
            StoreError::VerifyMismatch { .. } => "Write Verification Failed",
        }
    }
}

/// Where the store lives and how long it waits for the lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
    pub lock_timeout: Duration,
    pub retry_interval: Duration,
}

impl Default for StoreConfig {
    /// `.resourcenamingtool` under the current directory, or the temp dir
    fn default() -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
        Self::for_workdir(base)
    }
}

impl StoreConfig {
    /// Store inside the fixed subdirectory of `workdir`
    pub fn for_workdir(workdir: impl AsRef<Path>) -> Self {
        Self::in_dir(workdir.as_ref().join(STORE_DIR_NAME))
    }

    /// Store directly inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", CONFIG_FILE_NAME))
    }
}

/// Reads and writes the configuration snapshot under the lock protocol
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config: StoreConfig,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl ConfigStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the snapshot document
    pub fn path(&self) -> PathBuf {
        self.config.config_path()
    }

    /// Load the stored snapshot; `None` when nothing was written yet
    pub fn read(&self) -> Result<Option<ConfigurationSnapshot>, StoreError> {
        let _lock = self.lock()?;
        let path = self.path();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stored configuration");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let snapshot = ConfigurationSnapshot::from_json(&contents)
            .map_err(|source| StoreError::Decode {
                path: path.clone(),
                source,
            })?;
        debug!(
            path = %path.display(),
            bytes = contents.len(),
            defaults = snapshot.defaults.len(),
            additional_components = snapshot.additional_components.len(),
            naming_patterns = snapshot.additional_naming_patterns.len(),
            "loaded stored configuration"
        );
        Ok(Some(snapshot))
    }

    /// Replace the stored snapshot
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the old one, so a failed write leaves the previous snapshot
    /// in place.
    pub fn write(&self, snapshot: &ConfigurationSnapshot) -> Result<(), StoreError> {
        let json = snapshot.to_json()?;
        let _lock = self.lock()?;
        let path = self.path();

        let write_err = |source: io::Error| StoreError::Write {
            path: path.clone(),
            source,
        };

        let mut file = Builder::new()
            .prefix(".provider-config")
            .suffix(".tmp")
            .tempfile_in(&self.config.dir)
            .map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        set_owner_only(file.path()).map_err(write_err)?;
        file.persist(&path).map_err(|e| write_err(e.error))?;

        let actual = verify_written(&path, json.as_bytes())?;
        info!(path = %path.display(), bytes = actual, "stored configuration");
        Ok(())
    }

    /// Take both locks, creating the store directory once the mutex is held
    fn lock(&self) -> Result<ScopedLock, StoreError> {
        let process = ProcessGuard::acquire();
        ensure_dir(&self.config.dir)?;
        process.lock_file(
            &self.config.lock_path(),
            self.config.lock_timeout,
            self.config.retry_interval,
        )
    }
}

/// Read the stored document back and check its length against what was written
fn verify_written(path: &Path, expected: &[u8]) -> Result<usize, StoreError> {
    let written = fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if written.len() != expected.len() {
        return Err(StoreError::VerifyMismatch {
            path: path.to_path_buf(),
            expected: expected.len(),
            actual: written.len(),
        });
    }
    Ok(written.len())
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentValue, Slot};
    use pretty_assertions::assert_eq;

    fn store_in(dir: &Path) -> ConfigStore {
        ConfigStore::new(StoreConfig::in_dir(dir.join("store")))
    }

    #[test]
    fn test_paths() {
        let config = StoreConfig::for_workdir("/work");
        assert_eq!(config.dir, PathBuf::from("/work/.resourcenamingtool"));
        assert_eq!(
            config.config_path(),
            PathBuf::from("/work/.resourcenamingtool/provider-config.json")
        );
        assert_eq!(
            config.lock_path(),
            PathBuf::from("/work/.resourcenamingtool/provider-config.json.lock")
        );
        assert_eq!(config.lock_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_read_before_write_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.read().unwrap(), None);
        // Reading creates the directory and the lock file, never the document
        assert!(store.config().lock_path().exists());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let snapshot = ConfigurationSnapshot::new()
            .with_default(Slot::Environment, ComponentValue::full("production").with_shortcode("prd"))
            .with_naming_pattern("azurerm_resource_group", "{basename}-rg");

        store.write(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), Some(snapshot.clone()));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            snapshot.to_json().unwrap()
        );
    }

    #[test]
    fn test_verify_reads_the_document_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, b"{}").unwrap();

        assert_eq!(verify_written(&path, b"{}").unwrap(), 2);

        let err = verify_written(&path, b"{\"a\":1}").unwrap_err();
        assert!(matches!(
            err,
            StoreError::VerifyMismatch { expected: 7, actual: 2, .. }
        ));
        assert_eq!(err.summary(), "Write Verification Failed");

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            verify_written(&missing, b"{}").unwrap_err(),
            StoreError::Read { .. }
        ));
    }

    #[test]
    fn test_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let first = ConfigurationSnapshot::new().with_default(Slot::Basename, ComponentValue::full("first"));
        let second = ConfigurationSnapshot::new().with_default(Slot::Instance, ComponentValue::full("001"));

        store.write(&first).unwrap();
        store.write(&second).unwrap();
        assert_eq!(store.read().unwrap(), Some(second));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(&ConfigurationSnapshot::new()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_document_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(&store.config().dir).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.read().unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        assert_eq!(err.summary(), "Deserialization Failed");
    }

    #[test]
    fn test_directory_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let store = ConfigStore::new(StoreConfig::in_dir(blocker.join("store")));
        let err = store.read().unwrap_err();
        assert!(matches!(err, StoreError::CreateDir { .. }));
    }
}
