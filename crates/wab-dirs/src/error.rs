use thiserror::Error;

/// Errors from location resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirsError {
    /// The platform reports no application data directory.
    #[error("no application data directory available on this platform")]
    Unavailable,

    /// The wallet name cannot be used as a file name.
    #[error("invalid wallet name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result alias for location resolution.
pub type DirsResult<T> = Result<T, DirsError>;
