use wab_types::{AddressIndex, AddressKind};

use crate::error::{CodecError, CodecResult};

/// File magic identifying a wallet file.
pub const MAGIC: [u8; 4] = *b"WABF";

/// Current wallet format version.
pub const FORMAT_VERSION: u32 = 1;

/// Header size: magic + version + entry count.
const HEADER_LEN: usize = 12;

/// Trailer size: CRC32 of everything before it.
const TRAILER_LEN: usize = 4;

/// Serialize an address index to the wallet-file layout.
///
/// Deterministic for a given index: entries are written in the index's
/// sorted iteration order, so equal indices always produce equal bytes.
pub fn encode(index: &AddressIndex) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + TRAILER_LEN + index.len() * 40);

    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    buf.extend_from_slice(&(index.len() as u32).to_be_bytes());

    for (value, kind) in index {
        buf.push(kind.kind_tag());
        encode_varint(&mut buf, value.len() as u64);
        buf.extend_from_slice(value.as_bytes());
    }

    let crc = crc32fast::hash(&buf);
    buf.extend_from_slice(&crc.to_be_bytes());
    buf
}

/// Deserialize a wallet file back into an address index.
///
/// Exact inverse of [`encode`]. Fails on short input, bad magic, an
/// unsupported version, a checksum mismatch, an unknown kind tag, a
/// truncated entry, invalid UTF-8, a duplicate or empty address value, or
/// trailing bytes after the last entry.
pub fn decode(data: &[u8]) -> CodecResult<AddressIndex> {
    if data.len() < HEADER_LEN + TRAILER_LEN {
        return Err(CodecError::CorruptEntry {
            offset: 0,
            reason: "wallet data too short".into(),
        });
    }
    if data[0..4] != MAGIC {
        return Err(CodecError::InvalidMagic {
            expected: String::from_utf8_lossy(&MAGIC).into(),
            actual: String::from_utf8_lossy(&data[0..4]).into(),
        });
    }
    let version = u32::from_be_bytes(data[4..8].try_into().unwrap());
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    // Validate the checksum before interpreting any entry, so a torn write
    // is rejected whole instead of partially decoded.
    let body_end = data.len() - TRAILER_LEN;
    let expected_crc = u32::from_be_bytes(data[body_end..].try_into().unwrap());
    let actual_crc = crc32fast::hash(&data[..body_end]);
    if actual_crc != expected_crc {
        return Err(CodecError::ChecksumMismatch);
    }

    let count = u32::from_be_bytes(data[8..12].try_into().unwrap());
    let mut index = AddressIndex::new();
    let mut pos = HEADER_LEN;

    for _ in 0..count {
        if pos >= body_end {
            return Err(CodecError::CorruptEntry {
                offset: pos as u64,
                reason: "truncated entry".into(),
            });
        }
        let tag = data[pos];
        let kind = AddressKind::from_kind_tag(tag).ok_or(CodecError::UnknownKindTag {
            offset: pos as u64,
            tag,
        })?;
        pos += 1;

        let (len, consumed) =
            decode_varint(&data[pos..body_end]).ok_or_else(|| CodecError::CorruptEntry {
                offset: pos as u64,
                reason: "truncated or oversized length varint".into(),
            })?;
        pos += consumed;

        if len == 0 {
            return Err(CodecError::CorruptEntry {
                offset: pos as u64,
                reason: "empty address value".into(),
            });
        }
        if len > (body_end - pos) as u64 {
            return Err(CodecError::CorruptEntry {
                offset: pos as u64,
                reason: "value extends beyond wallet data".into(),
            });
        }
        let end = pos + len as usize;
        let value = std::str::from_utf8(&data[pos..end]).map_err(|_| CodecError::CorruptEntry {
            offset: pos as u64,
            reason: "value is not valid UTF-8".into(),
        })?;
        if index.insert(value.to_string(), kind).is_some() {
            return Err(CodecError::CorruptEntry {
                offset: pos as u64,
                reason: format!("duplicate address value: {value}"),
            });
        }
        pos = end;
    }

    if pos != body_end {
        return Err(CodecError::CorruptEntry {
            offset: pos as u64,
            reason: "trailing bytes after last entry".into(),
        });
    }

    Ok(index)
}

/// Encode a u64 as a variable-length integer.
fn encode_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a variable-length integer. Returns `(value, bytes_consumed)`,
/// or `None` if the input is truncated or the varint overflows 64 bits.
fn decode_varint(data: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in data.iter().enumerate() {
        value |= ((byte & 0x7F) as u64) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        if shift >= 64 {
            return None;
        }
    }
    None
}
