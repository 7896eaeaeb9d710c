//! Two-layer locking for the snapshot file
//!
//! Same-process callers serialize on a process-wide mutex first; processes then
//! serialize on an advisory `fs2` lock held on a sidecar `.lock` file. A
//! [`ScopedLock`] owns both and releases them in reverse order when dropped.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use parking_lot::{const_mutex, Mutex, MutexGuard};
use tracing::{debug, trace, warn};

use super::StoreError;

static PROCESS_LOCK: Mutex<()> = const_mutex(());

/// Holds the process-wide mutex; the first half of a [`ScopedLock`]
#[derive(Debug)]
pub struct ProcessGuard {
    _guard: MutexGuard<'static, ()>,
}

impl ProcessGuard {
    /// Block until no other thread of this process holds the store
    pub fn acquire() -> Self {
        let guard = PROCESS_LOCK.lock();
        trace!("acquired process lock");
        Self { _guard: guard }
    }

    /// Take the file lock at `path`, polling every `retry_interval`
    ///
    /// Gives up with [`StoreError::LockTimeout`] once `timeout` has elapsed. The
    /// process mutex is released again on every error path.
    pub fn lock_file(
        self,
        path: &Path,
        timeout: Duration,
        retry_interval: Duration,
    ) -> Result<ScopedLock, StoreError> {
        let file = open_lock_file(path).map_err(|source| StoreError::Lock {
            path: path.to_path_buf(),
            source,
        })?;

        let started = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => break,
                Err(err) if is_contended(&err) => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        warn!(
                            path = %path.display(),
                            attempts,
                            waited_ms = waited.as_millis() as u64,
                            "timed out waiting for file lock"
                        );
                        return Err(StoreError::LockTimeout {
                            path: path.to_path_buf(),
                            timeout,
                        });
                    }
                    trace!(path = %path.display(), attempts, "file lock busy, retrying");
                    thread::sleep(retry_interval.min(timeout - waited));
                }
                Err(source) => {
                    return Err(StoreError::Lock {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        debug!(path = %path.display(), attempts, "acquired file lock");
        Ok(ScopedLock {
            file,
            path: path.to_path_buf(),
            _process: self,
        })
    }
}

/// Both locks, held for one read or write of the snapshot
#[derive(Debug)]
pub struct ScopedLock {
    file: File,
    path: PathBuf,
    // Dropped after `file`, so the mutex outlives the file lock
    _process: ProcessGuard,
}

impl ScopedLock {
    /// Acquire the process mutex and then the file lock
    pub fn acquire(
        path: &Path,
        timeout: Duration,
        retry_interval: Duration,
    ) -> Result<Self, StoreError> {
        ProcessGuard::acquire().lock_file(path, timeout, retry_interval)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedLock {
    fn drop(&mut self) {
        match FileExt::unlock(&self.file) {
            Ok(()) => trace!(path = %self.path.display(), "released file lock"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "failed to release file lock"),
        }
    }
}

fn open_lock_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SHORT: Duration = Duration::from_millis(5);

    #[test]
    fn test_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider-config.json.lock");

        let lock = ScopedLock::acquire(&path, Duration::from_secs(1), SHORT).unwrap();
        assert_eq!(lock.path(), path);
        assert!(path.exists());
        drop(lock);

        // Released locks can be taken again immediately
        ScopedLock::acquire(&path, Duration::from_millis(100), SHORT).unwrap();
    }

    #[test]
    fn test_timeout_when_held_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider-config.json.lock");
        let holder = open_lock_file(&path).unwrap();
        FileExt::lock_exclusive(&holder).unwrap();

        let started = Instant::now();
        let err = ScopedLock::acquire(&path, Duration::from_millis(150), SHORT).unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout { .. }));
        assert!(started.elapsed() >= Duration::from_millis(150));

        FileExt::unlock(&holder).unwrap();
        ScopedLock::acquire(&path, Duration::from_secs(1), SHORT).unwrap();
    }

    #[test]
    fn test_threads_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = Arc::new(dir.path().join("provider-config.json.lock"));
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let path = Arc::clone(&path);
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    for _ in 0..5 {
                        let _lock = ScopedLock::acquire(&path, Duration::from_secs(5), SHORT).unwrap();
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        thread::sleep(Duration::from_millis(1));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_missing_directory_is_lock_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("provider-config.json.lock");
        let err = ScopedLock::acquire(&path, Duration::from_millis(50), SHORT).unwrap_err();
        assert!(matches!(err, StoreError::Lock { .. }));
    }
}
