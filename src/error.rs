//! Error types for block sequence operations.

/// Error type for block sequence operations.
///
/// The `NameRequired` and `SequenceOverflow` messages are part of the
/// allocator contract and are matched literally by consumers; they must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A request was made without a sequence name.
    NameRequired,

    /// A supplied or computed sequence value would exceed
    /// [`MAX_SAFE_VALUE`](crate::MAX_SAFE_VALUE).
    SequenceOverflow,

    /// A supplied sequence value could not be evaluated as a non-negative
    /// integer.
    InvalidValue(String),

    /// Storage-related errors from the underlying store backend.
    Storage(String),

    /// Encoding or decoding errors for stored sequence records.
    Encoding(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NameRequired => write!(f, "name is required"),
            Error::SequenceOverflow => {
                write!(f, "Sequence value exceeds maximum safe integer")
            }
            Error::InvalidValue(msg) => write!(f, "Invalid sequence value: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Encoding(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

/// Result type alias for block sequence operations.
pub type Result<T> = std::result::Result<T, Error>;
