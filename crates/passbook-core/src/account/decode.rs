//! Strict structural decoding of persisted account data.
//!
//! Persisted payloads are untrusted: anything can edit the backing store.
//! These decoders turn an untyped JSON value into typed records or fail
//! with a [`DecodeError`] naming the first offending field and value.

use passbook_storage::DecodeError;
use passbook_storage::value::{expect_array, expect_object, expect_string, require};
use serde_json::{Map, Value};

use super::model::{Account, AccountId, AccountKind, Tag};

/// Decodes one account record, stopping at the first violated check.
///
/// # Errors
///
/// Returns a [`DecodeError`] with the offending field path and value when
/// the record is not an object, a required field is absent, a field has the
/// wrong type, `id` or `login` is empty, `type` is not a known kind tag, or
/// a tag element lacks a string `text` field.
pub fn decode_account(value: &Value) -> Result<Account, DecodeError> {
    let object = expect_object(value)?;

    let id = nonempty_string_field(object, "id")?;
    let login = nonempty_string_field(object, "login")?;

    let password_value = require(object, "password")?;
    let password = match password_value {
        Value::Null => None,
        Value::String(password) => Some(password.clone()),
        other => {
            return Err(DecodeError::new("Account password must be null or a string")
                .with_field("password")
                .with_value(other.clone()));
        }
    };

    let kind_value = require(object, "type")?;
    let kind_tag = expect_string(kind_value).map_err(|err| err.with_field("type"))?;
    let kind = AccountKind::from_tag(kind_tag).ok_or_else(|| {
        DecodeError::new("Account type must be \"local\" or \"LDAP\"")
            .with_field("type")
            .with_value(kind_value.clone())
    })?;

    let tags_value = require(object, "tags")?;
    let items = expect_array(tags_value).map_err(|err| err.with_field("tags"))?;
    let mut tags = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let tag = decode_tag(item).map_err(|err| err.with_field(format!("tags[{index}]")))?;
        tags.push(tag);
    }

    Ok(Account {
        id: AccountId::new(id),
        login: login.to_string(),
        password,
        kind,
        tags,
    })
}

/// Decodes a persisted array of accounts.
///
/// The value must be an array; elements are then decoded in order, and a
/// per-element failure is rewrapped with the element's index so a caller
/// can pinpoint exactly which stored record is corrupt (field path
/// `[2].login` and the like).
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not an array or any element
/// fails [`decode_account`].
pub fn decode_accounts(value: &Value) -> Result<Vec<Account>, DecodeError> {
    let items = expect_array(value)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_account(item).map_err(|err| err.at_index(index)))
        .collect()
}

fn nonempty_string_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, DecodeError> {
    let value = require(object, field)?;
    let text = expect_string(value).map_err(|err| err.with_field(field))?;
    if text.trim().is_empty() {
        return Err(
            DecodeError::new(format!("Account {field} cannot be empty"))
                .with_field(field)
                .with_value(value.clone()),
        );
    }
    Ok(text)
}

fn decode_tag(value: &Value) -> Result<Tag, DecodeError> {
    value
        .as_object()
        .and_then(|tag| tag.get("text"))
        .and_then(Value::as_str)
        .map(Tag::new)
        .ok_or_else(|| {
            DecodeError::new("Tag must have a string text field").with_value(value.clone())
        })
}
