use std::path::PathBuf;

use crate::error::{DirsError, DirsResult};

/// Application subdirectory appended to the platform data directory.
const APP_DIR: &str = "wab";

/// Extension given to wallet files under the default location.
pub const WALLET_EXTENSION: &str = "wab";

/// Characters that are forbidden anywhere in a wallet name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0', ':'];

/// Canonical directory lookup consumed by the wallet store.
///
/// Implementations answer one question: which directory holds wallet files
/// by default? The lookup is pure; callers (the store's `create_default`)
/// are responsible for creating the directory before first use.
pub trait LocationResolver: Send + Sync {
    /// The directory where wallet files live.
    fn data_dir(&self) -> DirsResult<PathBuf>;
}

/// Platform data directory via the `dirs` crate: `%APPDATA%` on Windows,
/// `~/Library/Application Support` on macOS, the XDG data dir on Linux,
/// with the application subdirectory appended.
pub struct OsLocations;

impl LocationResolver for OsLocations {
    fn data_dir(&self) -> DirsResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(DirsError::Unavailable)
    }
}

/// Validate a wallet name, returning `Ok(())` if it is usable as a file
/// name under the data directory.
///
/// # Examples
///
/// ```
/// use wab_dirs::resolver::validate_wallet_name;
///
/// assert!(validate_wallet_name("main").is_ok());
/// assert!(validate_wallet_name("").is_err());
/// assert!(validate_wallet_name("../escape").is_err());
/// ```
pub fn validate_wallet_name(name: &str) -> DirsResult<()> {
    if name.is_empty() {
        return Err(DirsError::InvalidName {
            name: name.to_string(),
            reason: "wallet name must not be empty".into(),
        });
    }
    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(DirsError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }
    // Must not be or contain a parent-traversal component.
    if name == "." || name == ".." || name.contains("..") {
        return Err(DirsError::InvalidName {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }
    Ok(())
}

/// Resolve the default file path for the wallet `name` under the
/// resolver's data directory: `<data_dir>/<name>.wab`.
pub fn wallet_file_path(resolver: &dyn LocationResolver, name: &str) -> DirsResult<PathBuf> {
    validate_wallet_name(name)?;
    Ok(resolver
        .data_dir()?
        .join(format!("{name}.{WALLET_EXTENSION}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLocations(PathBuf);

    impl LocationResolver for FixedLocations {
        fn data_dir(&self) -> DirsResult<PathBuf> {
            Ok(self.0.clone())
        }
    }

    struct NoLocations;

    impl LocationResolver for NoLocations {
        fn data_dir(&self) -> DirsResult<PathBuf> {
            Err(DirsError::Unavailable)
        }
    }

    #[test]
    fn valid_names() {
        for name in ["main", "savings-2024", "cold storage", "wallet.bak"] {
            assert!(validate_wallet_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_names() {
        for name in ["", ".", "..", "../escape", "a/b", "a\\b", "a:b", "nul\0"] {
            assert!(
                validate_wallet_name(name).is_err(),
                "{name:?} should be invalid"
            );
        }
    }

    #[test]
    fn wallet_path_under_data_dir() {
        let resolver = FixedLocations(PathBuf::from("/var/wallets"));
        let path = wallet_file_path(&resolver, "main").unwrap();
        assert_eq!(path, PathBuf::from("/var/wallets/main.wab"));
    }

    #[test]
    fn wallet_path_rejects_bad_name_before_lookup() {
        // Name validation fires even when the resolver itself would fail.
        let err = wallet_file_path(&NoLocations, "../escape").unwrap_err();
        assert!(matches!(err, DirsError::InvalidName { .. }));
    }

    #[test]
    fn unavailable_data_dir_propagates() {
        let err = wallet_file_path(&NoLocations, "main").unwrap_err();
        assert_eq!(err, DirsError::Unavailable);
    }

    #[test]
    fn os_locations_appends_app_dir() {
        // The platform dir may be absent in minimal environments; when it
        // resolves, it must end with the application subdirectory.
        if let Ok(dir) = OsLocations.data_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
