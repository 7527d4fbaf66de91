//! # passbook-storage
//!
//! Validated key/value persistence layer for Passbook.
//!
//! This crate provides:
//! - A pluggable [`Backend`] trait over raw string key/value storage, with a
//!   file-per-key [`DirBackend`] and an in-memory [`MemoryBackend`]
//! - A [`Storage`] wrapper with typed, validated reads and writes, fallback
//!   defaults, custom codecs and a configurable error hook
//! - Structured shape-mismatch errors ([`DecodeError`]) and JSON value
//!   guards for strict decoding of untrusted payloads
//!
//! Reads favor returning a supplied fallback over failing; without one, the
//! original error surfaces. Writes are best-effort unless strict propagation
//! is requested.
//!
//! ```ignore
//! use passbook_storage::{MemoryBackend, ReadOptions, Storage, WriteOptions};
//!
//! let mut storage = Storage::new(MemoryBackend::new());
//! storage.set("answer", &42_u32, WriteOptions::default())?;
//! let answer: Option<u32> = storage.get("answer", ReadOptions::default())?;
//! assert_eq!(answer, Some(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod backend;
mod error;
mod store;
pub mod value;

pub use backend::{Backend, DirBackend, MemoryBackend};
pub use error::{DecodeError, Error, Result};
pub use store::{
    DecodeFn, EncodeFn, ErrorHook, Operation, ReadOptions, Storage, StorageConfig, ValidateFn,
    WriteOptions, log_storage_error,
};
