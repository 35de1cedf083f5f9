//! Wallet file byte format for the wallet address book.
//!
//! Pure functions over bytes: [`encode`] serializes an address index to the
//! versioned container layout, [`decode`] is its exact inverse. Neither
//! touches the filesystem; reading and writing the wallet file is the
//! store's job.
//!
//! # Layout
//!
//! ```text
//! [4 bytes]  magic  b"WABF"
//! [4 bytes]  format version (u32 BE)
//! [4 bytes]  entry count (u32 BE)
//! count * [
//!   [1 byte]   address kind tag
//!   [varint]   value length in bytes
//!   [N bytes]  value (UTF-8)
//! ]
//! [4 bytes]  CRC32 of all preceding bytes (u32 BE)
//! ```
//!
//! `decode` fails with a typed [`CodecError`] on any malformation rather
//! than silently dropping entries: a torn or partial write never yields a
//! subset of the stored addresses.

pub mod error;
pub mod format;

pub use error::{CodecError, CodecResult};
pub use format::{decode, encode, FORMAT_VERSION, MAGIC};
