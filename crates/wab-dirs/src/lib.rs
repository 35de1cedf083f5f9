//! OS location resolution for the wallet address book.
//!
//! A pure lookup service: given a wallet name, where does its file live?
//! The store consumes this through the [`LocationResolver`] trait so that
//! tests and embedders can pin wallet files anywhere without touching the
//! real platform directories. Nothing here creates directories or files.
//!
//! # Key Types
//!
//! - [`LocationResolver`] — Canonical data-directory lookup
//! - [`OsLocations`] — Platform implementation backed by the `dirs` crate
//! - [`wallet_file_path`] — Default wallet path construction with name
//!   validation

pub mod error;
pub mod resolver;

pub use error::{DirsError, DirsResult};
pub use resolver::{
    validate_wallet_name, wallet_file_path, LocationResolver, OsLocations, WALLET_EXTENSION,
};
