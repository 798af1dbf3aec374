//! Block Sequence - a named atomic block-sequence allocator.
//!
//! Block Sequence hands out non-overlapping, monotonically increasing ranges
//! of integer identifiers ("blocks") to concurrent callers. Each range is
//! drawn from a durable named counter (a "sequence") held in a
//! [`SequenceStore`] backend.
//!
//! # Architecture
//!
//! Two collaborating layers operate on the same durable record:
//!
//! - **[`SequenceStore`]**: durable, name-addressed storage of sequence
//!   records with atomic create-if-absent and fetch-add primitives. The
//!   store is the sole serialization point; the crate ships
//!   [`InMemorySequenceStore`], and any backend offering the same atomicity
//!   contract can be plugged in.
//! - **[`BlockSequence`]**: stateless orchestration that validates input,
//!   normalizes names, enforces the safe-integer ceiling, and shapes results.
//!
//! # Key Concepts
//!
//! - **Sequence**: a uniquely-named monotonic counter record. Names are
//!   case-insensitive; `value` is the last identifier handed out.
//! - **Block**: a contiguous identifier range `[next, next + remaining - 1]`
//!   allocated in one atomic step. Blocks are ephemeral result values and
//!   never expose the raw sequence value.
//!
//! # Example
//!
//! ```ignore
//! use block_sequence::{AllocateRequest, BlockSequence, Config, EnsureRequest};
//!
//! let sequences = BlockSequence::open(Config::default()).await?;
//!
//! // Create a sequence with an explicit starting value.
//! sequences.ensure(EnsureRequest::named("orders").with_value(100)).await?;
//!
//! // Allocate a block of 50 identifiers.
//! let block = sequences.allocate(AllocateRequest::named("orders").with_size(50)).await?;
//! assert_eq!(block.next, 101);
//! assert_eq!(block.remaining, 50);
//! ```

mod config;
mod error;
mod model;
mod sequence;
mod serde;
mod store;
mod value;

pub use config::{Config, StoreConfig};
pub use error::{Error, Result};
pub use model::{Block, MAX_SAFE_VALUE, Metadata, Sequence};
pub use sequence::{
    AllocateRequest, BlockSequence, DEFAULT_BLOCK_SIZE, EnsureRequest, RemoveRequest,
};
pub use store::in_memory::InMemorySequenceStore;
pub use store::SequenceStore;
pub use value::SequenceValue;
