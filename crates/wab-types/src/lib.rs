//! Foundation types for the wallet address book (wab).
//!
//! This crate provides the value types shared by the codec and the store.
//! It performs no I/O and holds no state.
//!
//! # Key Types
//!
//! - [`AddressKind`] — Closed classification of a stored address
//! - [`AddressRecord`] — One address value plus its classification
//! - [`AddressIndex`] — The in-memory index, keyed by address value

pub mod address;

pub use address::{AddressIndex, AddressKind, AddressRecord};
