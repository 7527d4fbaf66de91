//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] passbook_storage::Error),

    /// An account index does not exist.
    #[error("Account index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the list at the time of the call.
        len: usize,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
