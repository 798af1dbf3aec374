//! Key and record encoding for sequence storage.
//!
//! Storage key layout:
//!
//! ```text
//! | version (u8) | record_tag (u8) | name (bytes, lowercase) |
//! ```
//!
//! Sequence record value layout:
//!
//! ```text
//! | value (u64 BE) | metadata (JSON bytes, may be empty) |
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::model::Metadata;

/// Key format version.
pub const KEY_VERSION: u8 = 0x01;

/// Record tag for sequence records.
pub const SEQUENCE_RECORD_TAG: u8 = 0x02;

/// Encodes a storage key for a normalized sequence name.
pub fn encode_key(name: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(2 + name.len());
    buf.put_u8(KEY_VERSION);
    buf.put_u8(SEQUENCE_RECORD_TAG);
    buf.extend_from_slice(name.as_bytes());
    buf.freeze()
}

/// Encodes a sequence record value.
pub fn encode_record(value: u64, metadata: &Option<Metadata>) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u64(value);
    if let Some(metadata) = metadata {
        let json = serde_json::to_vec(metadata)
            .map_err(|e| Error::Encoding(format!("failed to encode metadata: {}", e)))?;
        buf.extend_from_slice(&json);
    }
    Ok(buf.freeze())
}

/// Decodes a sequence record value into its counter and metadata.
pub fn decode_record(data: &[u8]) -> Result<(u64, Option<Metadata>)> {
    if data.len() < 8 {
        return Err(Error::Encoding(format!(
            "buffer too short for sequence record: need 8 bytes, got {}",
            data.len()
        )));
    }

    let value = u64::from_be_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);

    let metadata = if data.len() > 8 {
        Some(
            serde_json::from_slice(&data[8..])
                .map_err(|e| Error::Encoding(format!("failed to decode metadata: {}", e)))?,
        )
    } else {
        None
    };

    Ok((value, metadata))
}
