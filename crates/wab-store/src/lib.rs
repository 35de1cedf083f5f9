//! Persistent wallet address repository.
//!
//! A [`WalletStore`] opens or creates one wallet file, loads its address
//! set into memory, and applies single or batched mutations while keeping
//! the in-memory index and the on-disk file consistent at all times:
//!
//! - Every successful mutation is durably flushed before it returns; a
//!   failed flush rolls the in-memory index back to its pre-call state.
//! - Batches are atomic with respect to persistence: the flush writes a
//!   temp file and atomically renames it over the old wallet, so a crash
//!   leaves the old complete file or the new complete file, never a hybrid.
//! - At most one store instance holds a wallet path open at a time,
//!   enforced through the injected [`LockManager`] capability.
//!
//! # Key Types
//!
//! - [`WalletStore`] — The repository: lifecycle, index, flush
//! - [`Lifecycle`] — Unopened / Open / Closed state machine
//! - [`LockManager`] / [`HeldLock`] — Exclusive-open capability
//! - [`FileLockManager`] — Sidecar-file advisory lock (default)
//! - [`InMemoryLockManager`] — Process-local lock table for tests
//!
//! # Design Rules
//!
//! 1. While open, memory equals the decoded file after every successful
//!    mutating call (read-after-write consistency, no lag).
//! 2. All failures surface as typed [`StoreError`]s; nothing is swallowed.
//! 3. No internal retries; retry policy belongs to the caller.
//! 4. All operations take `&mut self`: callers serialize access, the store
//!    adds no fine-grained locking of its own.

pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use lifecycle::Lifecycle;
pub use lock::{FileLockManager, HeldLock, InMemoryLockManager, LockManager};
pub use store::WalletStore;
