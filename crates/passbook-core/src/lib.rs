//! # passbook-core
//!
//! Core account management for Passbook.
//!
//! This crate provides:
//! - The [`Account`] model and its persisted JSON contract
//! - Strict structural decoding of persisted data ([`decode_account`],
//!   [`decode_accounts`])
//! - The [`AccountStore`] keeping an in-memory working set in sync with a
//!   [`passbook_storage`] backend
//! - Per-field form validation for in-edit records ([`RecordValidator`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod error;

pub use account::{
    Account, AccountId, AccountKind, AccountStore, FieldErrors, LOGIN_MAX_LENGTH,
    PASSWORD_MAX_LENGTH, RecordValidator, TAGS_MAX_TOTAL_LENGTH, Tag, ValidationError,
    decode_account, decode_accounts,
};
pub use error::{Error, Result};
