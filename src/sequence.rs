//! The block sequence allocator.
//!
//! [`BlockSequence`] turns high-level `ensure` / `allocate` / `remove`
//! intents into [`SequenceStore`] primitive calls. It is stateless and
//! re-entrant: contention is resolved inside the store's atomic primitives,
//! never by an allocator-level lock, so correctness holds across separate
//! processes sharing one durable store.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::config::{Config, StoreConfig};
use crate::error::{Error, Result};
use crate::model::{Block, Metadata, Sequence};
use crate::store::in_memory::InMemorySequenceStore;
use crate::store::SequenceStore;
use crate::value::SequenceValue;

/// Block size used when an allocate request does not specify one.
pub const DEFAULT_BLOCK_SIZE: u64 = 1;

/// Request to create a sequence if it does not already exist.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnsureRequest {
    /// The sequence name. Required; compared case-insensitively.
    pub name: Option<String>,
    /// Initial value for a newly created sequence. Defaults to 0. Ignored
    /// if the sequence already exists.
    pub value: Option<SequenceValue>,
    /// Metadata for a newly created sequence. Ignored if the sequence
    /// already exists.
    pub metadata: Option<Metadata>,
}

impl EnsureRequest {
    /// Creates a request for the given sequence name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the initial value for a newly created sequence.
    pub fn with_value(mut self, value: impl Into<SequenceValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the metadata for a newly created sequence.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Request to allocate a block of identifiers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllocateRequest {
    /// The sequence name. Required; compared case-insensitively.
    pub name: Option<String>,
    /// Number of identifiers to allocate. Defaults to
    /// [`DEFAULT_BLOCK_SIZE`]; 0 is treated as unspecified.
    pub size: Option<u64>,
    /// Metadata for the sequence if this call creates it lazily. Ignored
    /// if the sequence already exists.
    pub metadata: Option<Metadata>,
}

impl AllocateRequest {
    /// Creates a request for the given sequence name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the number of identifiers to allocate.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the metadata used if this allocation creates the sequence.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Request to remove a sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoveRequest {
    /// The sequence name. Required; compared case-insensitively.
    pub name: Option<String>,
}

impl RemoveRequest {
    /// Creates a request for the given sequence name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Validates a request name and normalizes it to lowercase.
///
/// Runs before any store access; a missing, empty, or whitespace-only name
/// fails with [`Error::NameRequired`].
fn normalized_name(name: &Option<String>) -> Result<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.to_lowercase()),
        _ => Err(Error::NameRequired),
    }
}

/// The block sequence allocator.
///
/// All methods take `&self` and may be invoked concurrently from any number
/// of tasks; clone the surrounding `Arc` or the store handle to share it.
///
/// # Example
///
/// ```ignore
/// use block_sequence::{AllocateRequest, BlockSequence, Config};
///
/// let sequences = BlockSequence::open(Config::default()).await?;
/// let block = sequences.allocate(AllocateRequest::named("orders").with_size(50)).await?;
/// // identifiers block.next ..= block.next + block.remaining - 1 are yours
/// ```
pub struct BlockSequence {
    store: Arc<dyn SequenceStore>,
}

impl BlockSequence {
    /// Opens an allocator with the store backend selected by `config`.
    pub async fn open(config: Config) -> Result<Self> {
        let store: Arc<dyn SequenceStore> = match config.store {
            StoreConfig::InMemory => Arc::new(InMemorySequenceStore::new()),
        };
        Ok(Self::with_store(store))
    }

    /// Creates an allocator over an existing store backend.
    ///
    /// The backend must uphold the [`SequenceStore`] atomicity contract.
    pub fn with_store(store: Arc<dyn SequenceStore>) -> Self {
        Self { store }
    }

    /// Ensures a sequence exists, creating it if absent.
    ///
    /// If the sequence already exists the requested value and metadata are
    /// silently discarded and the pre-existing record is returned unchanged:
    /// the first writer wins for the lifetime of the record.
    ///
    /// # Errors
    ///
    /// [`Error::NameRequired`] for a missing/empty name,
    /// [`Error::SequenceOverflow`] if the supplied value exceeds
    /// [`MAX_SAFE_VALUE`](crate::MAX_SAFE_VALUE) (checked with arbitrary
    /// precision before any store access, so no record is created).
    pub async fn ensure(&self, request: EnsureRequest) -> Result<Sequence> {
        let name = normalized_name(&request.name)?;
        let value = request
            .value
            .unwrap_or(SequenceValue::Number(0))
            .into_checked()?;

        let (sequence, created) = self
            .store
            .create_if_absent(&name, value, request.metadata)
            .await?;
        if created {
            debug!(name = %sequence.name, value = sequence.value, "sequence created");
        }
        Ok(sequence)
    }

    /// Allocates a block of identifiers from the named sequence.
    ///
    /// The sequence is created lazily with value 0 (and the request's
    /// metadata, if any) on first use; a prior [`ensure`](Self::ensure) call
    /// is never required. The returned block covers
    /// `[next, next + remaining - 1]`.
    ///
    /// # Errors
    ///
    /// [`Error::NameRequired`] for a missing/empty name,
    /// [`Error::SequenceOverflow`] if advancing by `size` would push the
    /// sequence past [`MAX_SAFE_VALUE`](crate::MAX_SAFE_VALUE) — in which
    /// case the stored value is left exactly as it was.
    pub async fn allocate(&self, request: AllocateRequest) -> Result<Block> {
        let name = normalized_name(&request.name)?;
        let size = match request.size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_BLOCK_SIZE,
        };

        let (sequence, _) = self
            .store
            .create_if_absent(&name, 0, request.metadata)
            .await?;
        let start = self.store.increment_and_get(&name, size).await?;

        Ok(Block {
            name,
            next: start + 1,
            remaining: size,
            metadata: sequence.metadata,
        })
    }

    /// Removes the named sequence.
    ///
    /// Removing an absent sequence is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::NameRequired`] for a missing/empty name.
    pub async fn remove(&self, request: RemoveRequest) -> Result<()> {
        let name = normalized_name(&request.name)?;
        self.store.remove(&name).await?;
        debug!(name = %name, "sequence removed");
        Ok(())
    }
}
