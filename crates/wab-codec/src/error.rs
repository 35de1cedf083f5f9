use thiserror::Error;

/// Errors produced when decoding a wallet file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid wallet magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    #[error("unsupported wallet format version: {0}")]
    UnsupportedVersion(u32),

    #[error("wallet checksum mismatch")]
    ChecksumMismatch,

    #[error("unknown address kind tag at offset {offset}: {tag:#04x}")]
    UnknownKindTag { offset: u64, tag: u8 },

    #[error("corrupt wallet entry at offset {offset}: {reason}")]
    CorruptEntry { offset: u64, reason: String },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
