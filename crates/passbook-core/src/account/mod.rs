//! Account management module.
//!
//! Provides the account model, strict decoding of persisted data, the
//! account store and per-field form validation.

mod decode;
mod model;
mod store;
mod validation;

pub use decode::{decode_account, decode_accounts};
pub use model::{Account, AccountId, AccountKind, Tag};
pub use store::AccountStore;
pub use validation::{
    FieldErrors, LOGIN_MAX_LENGTH, PASSWORD_MAX_LENGTH, RecordValidator, TAGS_MAX_TOTAL_LENGTH,
    ValidationError,
};
