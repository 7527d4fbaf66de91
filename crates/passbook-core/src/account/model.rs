//! Account model types.
//!
//! Field names and the two kind tags (`"local"`, `"LDAP"`) are part of the
//! persisted JSON contract; the serde attributes here pin them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    /// Creates an account ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random (UUID v4) account ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an account authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountKind {
    /// Locally stored credentials; a password is required.
    #[default]
    #[serde(rename = "local")]
    Local,
    /// Directory-backed account; no password is kept.
    #[serde(rename = "LDAP")]
    Ldap,
}

impl AccountKind {
    /// The persisted tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ldap => "LDAP",
        }
    }

    /// Parses a persisted tag back into a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "local" => Some(Self::Local),
            "LDAP" => Some(Self::Ldap),
            _ => None,
        }
    }

    /// Get display name for the account kind.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Ldap => "LDAP",
        }
    }
}

/// Free-text label attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The label text.
    pub text: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A stored credential record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Login name.
    pub login: String,
    /// Password; `None` for accounts that keep none (e.g. LDAP).
    pub password: Option<String>,
    /// How the account authenticates.
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// Labels attached to the account.
    pub tags: Vec<Tag>,
}

impl Account {
    /// Creates the blank record the add form starts from: a fresh ID, empty
    /// login, empty (but present) password, local kind and no tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: AccountId::generate(),
            login: String::new(),
            password: Some(String::new()),
            kind: AccountKind::Local,
            tags: Vec::new(),
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}
