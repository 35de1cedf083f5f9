//! Exclusive-open locking for wallet paths.
//!
//! At most one [`WalletStore`](crate::WalletStore) instance may hold a
//! wallet path open at a time. The store acquires the lock through the
//! [`LockManager`] capability, which is injected so the repository logic
//! stays portable and testable without real file contention.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// An exclusive lock over one wallet path, held for the OPEN lifetime.
///
/// Dropping the guard releases the lock; since the store owns its guard,
/// release also happens (best effort) when the store is dropped without an
/// explicit `close`.
pub trait HeldLock: Send + std::fmt::Debug {}

/// Acquires exclusive locks for wallet paths.
pub trait LockManager: Send + Sync {
    /// Acquire the lock for `path`, failing with
    /// [`StoreError::AlreadyOpenElsewhere`] on contention.
    fn acquire(&self, path: &Path) -> StoreResult<Box<dyn HeldLock>>;
}

/// Advisory sidecar-file lock: `<wallet>.lock` created with `create_new`.
///
/// Cooperating processes that use the same convention exclude each other.
/// A lock file left behind by a crashed process reads as contention; the
/// library never removes it on its own — that is an operator decision.
pub struct FileLockManager;

#[derive(Debug)]
struct FileLockGuard {
    lock_path: PathBuf,
}

impl HeldLock for FileLockGuard {}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            warn!(path = %self.lock_path.display(), error = %e, "failed to remove lock file");
        }
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

impl LockManager for FileLockManager {
    fn acquire(&self, path: &Path) -> StoreResult<Box<dyn HeldLock>> {
        let lock_path = lock_path_for(path);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => {
                debug!(path = %path.display(), "wallet lock acquired");
                Ok(Box::new(FileLockGuard { lock_path }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyOpenElsewhere(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local lock table for tests and embedding.
///
/// All state lives in a `HashSet` behind a `Mutex`; locks vanish with the
/// manager. Clones share the same table.
#[derive(Clone, Default)]
pub struct InMemoryLockManager {
    held: Arc<Mutex<HashSet<PathBuf>>>,
}

impl InMemoryLockManager {
    /// Create a new empty lock table.
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
struct InMemoryLockGuard {
    path: PathBuf,
    held: Arc<Mutex<HashSet<PathBuf>>>,
}

impl HeldLock for InMemoryLockGuard {}

impl Drop for InMemoryLockGuard {
    fn drop(&mut self) {
        self.held.lock().expect("lock poisoned").remove(&self.path);
    }
}

impl LockManager for InMemoryLockManager {
    fn acquire(&self, path: &Path) -> StoreResult<Box<dyn HeldLock>> {
        let mut held = self.held.lock().expect("lock poisoned");
        if !held.insert(path.to_path_buf()) {
            return Err(StoreError::AlreadyOpenElsewhere(path.to_path_buf()));
        }
        Ok(Box::new(InMemoryLockGuard {
            path: path.to_path_buf(),
            held: Arc::clone(&self.held),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_contention_and_release() {
        let locks = InMemoryLockManager::new();
        let path = Path::new("/wallets/main.wab");

        let guard = locks.acquire(path).unwrap();
        let err = locks.acquire(path).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyOpenElsewhere(_)));

        drop(guard);
        assert!(locks.acquire(path).is_ok());
    }

    #[test]
    fn in_memory_distinct_paths_do_not_contend() {
        let locks = InMemoryLockManager::new();
        let _a = locks.acquire(Path::new("/wallets/a.wab")).unwrap();
        let _b = locks.acquire(Path::new("/wallets/b.wab")).unwrap();
    }

    #[test]
    fn in_memory_clones_share_the_table() {
        let locks = InMemoryLockManager::new();
        let clone = locks.clone();
        let _guard = locks.acquire(Path::new("/wallets/main.wab")).unwrap();
        let err = clone.acquire(Path::new("/wallets/main.wab")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyOpenElsewhere(_)));
    }

    #[test]
    fn file_lock_contention_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = dir.path().join("main.wab");

        let guard = FileLockManager.acquire(&wallet).unwrap();
        assert!(lock_path_for(&wallet).exists());

        let err = FileLockManager.acquire(&wallet).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyOpenElsewhere(_)));

        drop(guard);
        assert!(!lock_path_for(&wallet).exists());
        assert!(FileLockManager.acquire(&wallet).is_ok());
    }

    #[test]
    fn stale_lock_file_reads_as_contention() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = dir.path().join("main.wab");
        std::fs::write(lock_path_for(&wallet), b"").unwrap();

        let err = FileLockManager.acquire(&wallet).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyOpenElsewhere(_)));
    }
}
