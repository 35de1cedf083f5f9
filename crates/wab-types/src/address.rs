use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classification of a stored address.
///
/// The store never interprets the kind beyond tagging and filtering; what a
/// kind *means* (derivation scheme, visibility on chain) is the surrounding
/// system's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressKind {
    /// Publicly visible address.
    Transparent,
    /// Privacy-preserving address.
    Shielded,
}

impl AddressKind {
    /// Stable on-disk tag for the wallet-file format.
    pub fn kind_tag(&self) -> u8 {
        match self {
            Self::Transparent => b't',
            Self::Shielded => b'z',
        }
    }

    /// Parse from an on-disk tag.
    pub fn from_kind_tag(tag: u8) -> Option<Self> {
        match tag {
            b't' => Some(Self::Transparent),
            b'z' => Some(Self::Shielded),
            _ => None,
        }
    }
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transparent => write!(f, "transparent"),
            Self::Shielded => write!(f, "shielded"),
        }
    }
}

/// One stored address plus its classification.
///
/// The value is opaque to this crate: no format validation is performed
/// (addresses arrive pre-validated from the key-management layer). Identity
/// is the `value` alone; the kind is an attribute of that identity. Records
/// are immutable — the store inserts and removes whole records, never
/// mutates one in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRecord {
    value: String,
    kind: AddressKind,
}

impl AddressRecord {
    /// Create a new record from an address value and its kind.
    pub fn new(value: impl Into<String>, kind: AddressKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// The address string.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The address classification.
    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// Decompose into the index's key/value pair.
    pub fn into_parts(self) -> (String, AddressKind) {
        (self.value, self.kind)
    }
}

impl std::fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value, self.kind)
    }
}

/// The in-memory address index: keyed by address value, therefore unique by
/// construction, and iterated in sorted order (which makes the on-disk
/// encoding deterministic for free).
pub type AddressIndex = BTreeMap<String, AddressKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_roundtrip() {
        for kind in [AddressKind::Transparent, AddressKind::Shielded] {
            let tag = kind.kind_tag();
            let parsed = AddressKind::from_kind_tag(tag).unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn unknown_kind_tag() {
        assert!(AddressKind::from_kind_tag(b'x').is_none());
        assert!(AddressKind::from_kind_tag(0).is_none());
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", AddressKind::Transparent), "transparent");
        assert_eq!(format!("{}", AddressKind::Shielded), "shielded");
    }

    #[test]
    fn record_accessors() {
        let record = AddressRecord::new("t1abc", AddressKind::Transparent);
        assert_eq!(record.value(), "t1abc");
        assert_eq!(record.kind(), AddressKind::Transparent);
    }

    #[test]
    fn record_into_parts() {
        let record = AddressRecord::new("zs1def", AddressKind::Shielded);
        let (value, kind) = record.into_parts();
        assert_eq!(value, "zs1def");
        assert_eq!(kind, AddressKind::Shielded);
    }

    #[test]
    fn index_is_unique_by_value() {
        let mut index = AddressIndex::new();
        index.insert("t1abc".to_string(), AddressKind::Transparent);
        index.insert("t1abc".to_string(), AddressKind::Shielded);
        assert_eq!(index.len(), 1);
        assert_eq!(index["t1abc"], AddressKind::Shielded);
    }

    #[test]
    fn index_iterates_sorted() {
        let mut index = AddressIndex::new();
        index.insert("zebra".to_string(), AddressKind::Shielded);
        index.insert("alpha".to_string(), AddressKind::Transparent);
        let keys: Vec<&String> = index.keys().collect();
        assert_eq!(keys, ["alpha", "zebra"]);
    }
}
