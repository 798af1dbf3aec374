//! The durable store contract for sequence records.

pub mod in_memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Metadata, Sequence};

/// Durable, name-addressed storage of sequence records.
///
/// The store is the sole serialization point of the allocator: the
/// [`BlockSequence`](crate::BlockSequence) operations hold no lock of their
/// own, so correctness rests entirely on these primitives being atomic and
/// linearizable per name. The atomicity unit is per-name; different names
/// must not contend on the increment path (no global lock across names).
///
/// Backends that cannot offer an atomic per-key read-modify-write (e.g.
/// eventually consistent stores) cannot satisfy this contract and must not
/// be used as a `SequenceStore`.
///
/// Callers pass names already normalized to lowercase.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Looks up a sequence record by name. Pure read.
    async fn find(&self, name: &str) -> Result<Option<Sequence>>;

    /// Atomically creates the record if absent.
    ///
    /// Under unbounded concurrent callers racing to create the same name, at
    /// most one insert ever succeeds; every other caller observes the
    /// winner's record unchanged. Returns the record and whether this call
    /// created it.
    async fn create_if_absent(
        &self,
        name: &str,
        initial_value: u64,
        metadata: Option<Metadata>,
    ) -> Result<(Sequence, bool)>;

    /// Atomically advances the sequence by `delta`, returning the
    /// pre-increment value.
    ///
    /// Concurrent increments on the same name are serialized such that the
    /// returned ranges `(returned, returned + delta]` are pairwise disjoint
    /// and tile the advanced span with no gaps.
    ///
    /// The [`MAX_SAFE_VALUE`](crate::MAX_SAFE_VALUE) bound check is part of
    /// the same atomic step: if the post-increment value would exceed the
    /// ceiling, the call fails with
    /// [`Error::SequenceOverflow`](crate::Error::SequenceOverflow) and the
    /// stored value is left exactly as it was.
    async fn increment_and_get(&self, name: &str, delta: u64) -> Result<u64>;

    /// Deletes the record if present. Idempotent; absent names are not an
    /// error.
    async fn remove(&self, name: &str) -> Result<()>;
}
