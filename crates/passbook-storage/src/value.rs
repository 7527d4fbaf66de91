//! Guards for strict decoding of untyped JSON values.
//!
//! Each guard narrows a [`Value`] to the requested shape or returns a
//! [`DecodeError`] describing the mismatch, so callers can chain checks with
//! `?` instead of sprinkling `as_*` unwraps.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Narrows a value to an object.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not an object.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::expected("object", value))
}

/// Narrows a value to an array.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not an array.
pub fn expect_array(value: &Value) -> Result<&Vec<Value>, DecodeError> {
    value
        .as_array()
        .ok_or_else(|| DecodeError::expected("array", value))
}

/// Narrows a value to a string.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not a string.
pub fn expect_string(value: &Value) -> Result<&str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::expected("string", value))
}

/// Narrows a value to a number.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not a number.
pub fn expect_number(value: &Value) -> Result<f64, DecodeError> {
    value
        .as_f64()
        .ok_or_else(|| DecodeError::expected("number", value))
}

/// Narrows a value to a boolean.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not a boolean.
pub fn expect_bool(value: &Value) -> Result<bool, DecodeError> {
    value
        .as_bool()
        .ok_or_else(|| DecodeError::expected("boolean", value))
}

/// Looks up a mandatory field on an object.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the field if it is absent.
pub fn require<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value, DecodeError> {
    object
        .get(key)
        .ok_or_else(|| DecodeError::new(format!("Missing required field: {key}")).with_field(key))
}
