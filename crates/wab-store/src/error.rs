use std::path::PathBuf;

use thiserror::Error;

use crate::lifecycle::Lifecycle;

/// Errors surfaced by wallet store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `open` was asked for a wallet file that does not exist.
    #[error("wallet file not found: {0}")]
    NotFound(PathBuf),

    /// `create` would overwrite an existing wallet file.
    #[error("wallet file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Another store instance holds the lock for this wallet path.
    #[error("wallet already open elsewhere: {0}")]
    AlreadyOpenElsewhere(PathBuf),

    /// The wallet file exists but its contents do not decode.
    #[error("corrupt wallet file: {0}")]
    Corrupt(#[from] wab_codec::CodecError),

    /// Operation issued outside the OPEN lifecycle state.
    #[error("operation not valid while the store is {state}")]
    InvalidState { state: Lifecycle },

    /// Malformed caller input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The default wallet location could not be resolved.
    #[error("wallet location error: {0}")]
    Location(#[from] wab_dirs::DirsError),

    /// Flush or other file I/O failed.
    #[error("wallet I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
