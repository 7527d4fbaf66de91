//! Raw key/value storage backends.
//!
//! A backend stores opaque strings under textual keys; all typing and
//! validation happens in the [`Storage`](crate::Storage) wrapper above it.

mod dir;
mod memory;

pub use dir::DirBackend;
pub use memory::MemoryBackend;

/// Synchronous string key/value substrate.
pub trait Backend {
    /// Reads the raw string stored at `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn read(&self, key: &str) -> std::io::Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be modified.
    fn delete(&mut self, key: &str) -> std::io::Result<()>;

    /// Removes every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be modified.
    fn clear(&mut self) -> std::io::Result<()>;

    /// Every stored key, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be enumerated.
    fn keys(&self) -> std::io::Result<Vec<String>>;
}
