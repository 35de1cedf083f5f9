//! The wallet store: lifecycle, in-memory index, and durable flush.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::debug;

use wab_dirs::{wallet_file_path, LocationResolver};
use wab_types::{AddressIndex, AddressKind, AddressRecord};

use crate::error::{StoreError, StoreResult};
use crate::lifecycle::Lifecycle;
use crate::lock::{FileLockManager, HeldLock, LockManager};

/// Persistent repository of wallet addresses backed by one wallet file.
///
/// The store owns the in-memory [`AddressIndex`], the lifecycle state, and
/// the bound file path. While open, the index and the decoded contents of
/// the file are equal immediately after every successful mutating call:
/// mutations flush durably before returning, and a failed flush rolls the
/// index back to its pre-call state.
///
/// All operations take `&mut self`; callers serialize access. The held
/// lock is released on [`close`](Self::close) and, best effort, when the
/// store is dropped.
pub struct WalletStore {
    lifecycle: Lifecycle,
    path: Option<PathBuf>,
    index: AddressIndex,
    lock: Option<Box<dyn HeldLock>>,
    locks: Arc<dyn LockManager>,
}

impl std::fmt::Debug for WalletStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletStore")
            .field("lifecycle", &self.lifecycle)
            .field("path", &self.path)
            .field("entries", &self.index.len())
            .finish()
    }
}

impl WalletStore {
    /// Create an unopened store with the default sidecar-file lock.
    pub fn new() -> Self {
        Self::with_lock_manager(Arc::new(FileLockManager))
    }

    /// Create an unopened store with an injected lock manager.
    pub fn with_lock_manager(locks: Arc<dyn LockManager>) -> Self {
        Self {
            lifecycle: Lifecycle::Unopened,
            path: None,
            index: AddressIndex::new(),
            lock: None,
            locks,
        }
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Open an existing wallet file and load its address set.
    ///
    /// Fails with [`StoreError::NotFound`] if no file exists at `path`,
    /// [`StoreError::Corrupt`] if it exists but does not decode, and
    /// [`StoreError::AlreadyOpenElsewhere`] if another instance holds the
    /// lock. The lock is released again on every failure path.
    pub fn open(&mut self, path: &Path) -> StoreResult<()> {
        self.ensure_unopened()?;
        let lock = self.locks.acquire(path)?;
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let index = wab_codec::decode(&bytes)?;
        debug!(path = %path.display(), entries = index.len(), "wallet opened");

        self.path = Some(path.to_path_buf());
        self.index = index;
        self.lock = Some(lock);
        self.lifecycle = Lifecycle::Open;
        Ok(())
    }

    /// Create a new wallet file and open it with an empty address set.
    ///
    /// Never silently overwrites: fails with [`StoreError::AlreadyExists`]
    /// if a file is already present at `path`. The empty-but-valid wallet
    /// file is written durably before this returns.
    pub fn create(&mut self, path: &Path) -> StoreResult<()> {
        self.ensure_unopened()?;
        let lock = self.locks.acquire(path)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }

        let index = AddressIndex::new();
        let bytes = wab_codec::encode(&index);
        // create_new so a racing creator outside our lock convention still
        // cannot be overwritten.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists(path.to_path_buf())
                } else {
                    StoreError::Io(e)
                }
            })?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        debug!(path = %path.display(), "wallet created");

        self.path = Some(path.to_path_buf());
        self.index = index;
        self.lock = Some(lock);
        self.lifecycle = Lifecycle::Open;
        Ok(())
    }

    /// Open the wallet `name` at its default location under `resolver`.
    pub fn open_default(
        &mut self,
        resolver: &dyn LocationResolver,
        name: &str,
    ) -> StoreResult<()> {
        let path = wallet_file_path(resolver, name)?;
        self.open(&path)
    }

    /// Create the wallet `name` at its default location under `resolver`,
    /// creating the data directory first if needed.
    pub fn create_default(
        &mut self,
        resolver: &dyn LocationResolver,
        name: &str,
    ) -> StoreResult<()> {
        let path = wallet_file_path(resolver, name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.create(&path)
    }

    /// Flush the index and release the wallet file.
    ///
    /// Idempotent: closing an already-closed store returns `Ok(())`. If
    /// the final flush fails the store stays open so the caller can retry.
    pub fn close(&mut self) -> StoreResult<()> {
        match self.lifecycle {
            Lifecycle::Closed => Ok(()),
            Lifecycle::Unopened => Err(StoreError::InvalidState {
                state: self.lifecycle,
            }),
            Lifecycle::Open => {
                let path = self.bound_path()?.to_path_buf();
                flush_to(&path, &self.index)?;
                debug!(path = %path.display(), "wallet closed");
                self.lock = None;
                self.index.clear();
                self.lifecycle = Lifecycle::Closed;
                Ok(())
            }
        }
    }

    /// Whether the store is currently open. Pure query, never fails.
    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The bound wallet file path, once open or closed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Insert one address record, replacing the kind of an existing record
    /// with the same value (callers legitimately re-classify addresses).
    ///
    /// Returns only after the change is durably flushed; on flush failure
    /// the in-memory index is left at its pre-call state and the error is
    /// surfaced.
    pub fn insert_address(&mut self, record: AddressRecord) -> StoreResult<()> {
        self.insert_address_batch([record])
    }

    /// Insert a batch of records as one atomic unit.
    ///
    /// Either every record is reflected in both memory and the durable
    /// file, or none is. The flush writes a temp file and atomically
    /// renames it over the old wallet, so a crash mid-flush leaves the old
    /// complete file or the new complete file, never a hybrid.
    pub fn insert_address_batch<I>(&mut self, records: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = AddressRecord>,
    {
        self.ensure_open()?;
        let mut next = self.index.clone();
        for record in records {
            let (value, kind) = record.into_parts();
            if value.is_empty() {
                return Err(StoreError::InvalidArgument(
                    "empty address value".into(),
                ));
            }
            next.insert(value, kind);
        }
        self.commit(next)
    }

    /// Delete the record with the given value.
    ///
    /// Deleting an absent address is a no-op success: callers may race
    /// harmlessly. Otherwise the same durable-flush-with-rollback contract
    /// as insert applies.
    pub fn delete_address(&mut self, value: &str) -> StoreResult<()> {
        self.ensure_open()?;
        if !self.index.contains_key(value) {
            return Ok(());
        }
        let mut next = self.index.clone();
        next.remove(value);
        self.commit(next)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// All records of the given kind, sorted by address value.
    /// Reads memory only; never touches disk.
    pub fn list_addresses(&self, kind: AddressKind) -> StoreResult<Vec<AddressRecord>> {
        self.ensure_open()?;
        Ok(self
            .index
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(value, k)| AddressRecord::new(value.clone(), *k))
            .collect())
    }

    /// Every stored record, sorted by address value.
    pub fn list_all(&self) -> StoreResult<Vec<AddressRecord>> {
        self.ensure_open()?;
        Ok(self
            .index
            .iter()
            .map(|(value, kind)| AddressRecord::new(value.clone(), *kind))
            .collect())
    }

    /// Whether a record with the given value is stored.
    pub fn contains(&self, value: &str) -> StoreResult<bool> {
        self.ensure_open()?;
        Ok(self.index.contains_key(value))
    }

    /// Number of records in the in-memory index (0 unless open).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ---------------------------------------------------------------
    // Internal
    // ---------------------------------------------------------------

    fn ensure_open(&self) -> StoreResult<()> {
        if self.lifecycle != Lifecycle::Open {
            return Err(StoreError::InvalidState {
                state: self.lifecycle,
            });
        }
        Ok(())
    }

    fn ensure_unopened(&self) -> StoreResult<()> {
        if self.lifecycle != Lifecycle::Unopened {
            return Err(StoreError::InvalidState {
                state: self.lifecycle,
            });
        }
        Ok(())
    }

    fn bound_path(&self) -> StoreResult<&Path> {
        match &self.path {
            Some(path) => Ok(path),
            None => Err(StoreError::InvalidState {
                state: self.lifecycle,
            }),
        }
    }

    /// Flush `next` durably, then commit it as the in-memory index.
    /// On failure the in-memory index is untouched, so memory stays equal
    /// to the last durable file contents.
    fn commit(&mut self, next: AddressIndex) -> StoreResult<()> {
        let path = self.bound_path()?.to_path_buf();
        flush_to(&path, &next)?;
        self.index = next;
        Ok(())
    }
}

impl Default for WalletStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the encoded index to a temp file in the wallet's directory, sync
/// it, and atomically rename it over the old wallet file.
fn flush_to(path: &Path, index: &AddressIndex) -> StoreResult<()> {
    let bytes = wab_codec::encode(index);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    debug!(path = %path.display(), entries = index.len(), bytes = bytes.len(), "wallet flushed");
    Ok(())
}
