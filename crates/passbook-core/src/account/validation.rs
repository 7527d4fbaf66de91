//! Per-field validation of an account being edited.

use super::model::{Account, AccountKind};

/// Maximum total length of all tag texts on one account, in characters.
pub const TAGS_MAX_TOTAL_LENGTH: usize = 50;

/// Maximum login length, in characters.
pub const LOGIN_MAX_LENGTH: usize = 100;

/// Maximum password length, in characters.
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Validation error for an in-edit account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Login is empty.
    LoginRequired,
    /// Login exceeds [`LOGIN_MAX_LENGTH`].
    LoginTooLong,
    /// A local account has no password.
    PasswordRequired,
    /// Password exceeds [`PASSWORD_MAX_LENGTH`].
    PasswordTooLong,
    /// The summed tag text length exceeds [`TAGS_MAX_TOTAL_LENGTH`].
    TagsTooLong,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::LoginRequired => "Login is required",
            Self::LoginTooLong => "Login must not exceed 100 characters",
            Self::PasswordRequired => "Password is required for local accounts",
            Self::PasswordTooLong => "Password must not exceed 100 characters",
            Self::TagsTooLong => "Tags must not exceed 50 characters in total",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::LoginRequired | Self::LoginTooLong => "login",
            Self::PasswordRequired | Self::PasswordTooLong => "password",
            Self::TagsTooLong => "tags",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Per-field error sets for one in-edit record. An empty set means the
/// field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    /// Errors against the tag list.
    pub tags: Vec<ValidationError>,
    /// Errors against the login.
    pub login: Vec<ValidationError>,
    /// Errors against the password.
    pub password: Vec<ValidationError>,
}

impl FieldErrors {
    /// Whether every field is currently valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tags.is_empty() && self.login.is_empty() && self.password.is_empty()
    }

    fn clear(&mut self) {
        self.tags.clear();
        self.login.clear();
        self.password.clear();
    }
}

/// Validates one account record field by field.
///
/// Each [`validate`](Self::validate) call clears all three error sets and
/// re-checks the record, so the validator can be reused across edits of the
/// same row.
#[derive(Debug, Default)]
pub struct RecordValidator {
    errors: FieldErrors,
}

impl RecordValidator {
    /// Creates a validator with no recorded errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-checks `account` and returns whether it is currently valid.
    pub fn validate(&mut self, account: &Account) -> bool {
        self.errors.clear();

        let tag_total: usize = account
            .tags
            .iter()
            .map(|tag| tag.text.chars().count())
            .sum();
        if tag_total > TAGS_MAX_TOTAL_LENGTH {
            self.errors.tags.push(ValidationError::TagsTooLong);
        }

        if account.login.is_empty() {
            self.errors.login.push(ValidationError::LoginRequired);
        }
        if account.login.chars().count() > LOGIN_MAX_LENGTH {
            self.errors.login.push(ValidationError::LoginTooLong);
        }

        let password = account.password.as_deref().unwrap_or_default();
        if account.kind == AccountKind::Local && password.is_empty() {
            self.errors.password.push(ValidationError::PasswordRequired);
        }
        if password.chars().count() > PASSWORD_MAX_LENGTH {
            self.errors.password.push(ValidationError::PasswordTooLong);
        }

        self.errors.is_valid()
    }

    /// The error sets from the most recent [`validate`](Self::validate) call.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the most recently validated record was valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }
}
