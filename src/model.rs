//! Data types for block sequence operations.

use serde::Serialize;

/// The largest sequence value the allocator will represent.
///
/// Matches the floating-point safe-integer ceiling (2^53 - 1) so that
/// identifiers survive environments that round-trip them through doubles.
/// Any operation that would push a sequence past this value fails whole.
pub const MAX_SAFE_VALUE: u64 = (1 << 53) - 1;

/// Opaque metadata attached to a sequence at creation time.
///
/// Stored verbatim and returned unchanged on every read; never interpreted
/// by the allocator.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A durable named monotonic counter record.
///
/// `value` is the last identifier handed out from this sequence (0 for a
/// freshly auto-created sequence); the next allocated block starts at
/// `value + 1`. Names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    /// The normalized (lowercase) sequence name.
    pub name: String,
    /// The last identifier handed out. Never exceeds [`MAX_SAFE_VALUE`].
    pub value: u64,
    /// Metadata attached when the sequence was created, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// A contiguous range of identifiers drawn from a sequence in one atomic
/// allocation.
///
/// The range is `[next, next + remaining - 1]`. Blocks are ephemeral result
/// values with no persistent identity, and deliberately carry no `value`
/// field: a block is an allocation-scoped view, not a sequence snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// The normalized (lowercase) sequence name the block was drawn from.
    pub name: String,
    /// The first identifier in the allocated range (inclusive).
    pub next: u64,
    /// The count of identifiers in the range.
    pub remaining: u64,
    /// Metadata of the underlying sequence at allocation time, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pin_safe_integer_ceiling() {
        assert_eq!(MAX_SAFE_VALUE, 9_007_199_254_740_991);
    }

    #[test]
    fn should_serialize_block_without_value_field() {
        // given
        let block = Block {
            name: "orders".to_string(),
            next: 1,
            remaining: 10,
            metadata: None,
        };

        // when
        let json = serde_json::to_value(&block).unwrap();

        // then
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("value"));
        assert!(!object.contains_key("metadata"));
        assert_eq!(object["next"], 1);
        assert_eq!(object["remaining"], 10);
    }

    #[test]
    fn should_serialize_sequence_metadata_verbatim() {
        // given
        let mut metadata = Metadata::new();
        metadata.insert("info".to_string(), "additional info".into());
        let sequence = Sequence {
            name: "orders".to_string(),
            value: 11,
            metadata: Some(metadata),
        };

        // when
        let json = serde_json::to_value(&sequence).unwrap();

        // then
        assert_eq!(json["metadata"]["info"], "additional info");
        assert_eq!(json["value"], 11);
    }
}
