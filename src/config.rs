//! Configuration for opening a [`BlockSequence`](crate::BlockSequence).

/// Configuration for opening a [`BlockSequence`](crate::BlockSequence).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Store backend configuration.
    pub store: StoreConfig,
}

/// Built-in store backend selection.
///
/// External backends (database-backed stores and the like) bypass this enum
/// entirely via [`BlockSequence::with_store`](crate::BlockSequence::with_store).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreConfig {
    /// Non-durable in-memory store, for testing and single-process use.
    #[default]
    InMemory,
}
