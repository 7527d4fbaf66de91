//! Error types for storage operations.

use serde_json::Value;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying backend I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded data does not match the expected shape.
    #[error("Validation error: {0}")]
    Decode(#[from] DecodeError),
}

/// Raised when a value does not match the shape a caller expects.
///
/// Carries a human-readable message plus, where known, the offending field
/// path and the offending value, so a caller can pinpoint exactly which part
/// of a stored payload is corrupt.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    message: String,
    field: Option<String>,
    value: Option<Value>,
}

impl DecodeError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            value: None,
        }
    }

    /// Creates a type-mismatch error describing what was expected and what
    /// was actually found.
    ///
    /// The actual value is rendered as its JSON type plus a snippet of the
    /// serialized value, truncated to 100 characters.
    #[must_use]
    pub fn expected(expected: &str, actual: &Value) -> Self {
        Self::new(format!(
            "Expected {expected}, got {}: {}",
            json_type_name(actual),
            snippet(actual)
        ))
        .with_value(actual.clone())
    }

    /// Attaches the offending field path.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attaches the offending value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Rewraps a per-element failure with the element's array index.
    ///
    /// The field path is prefixed with `[index]` and the message notes the
    /// index; the offending value is preserved.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        let field = match self.field {
            Some(field) => format!("[{index}].{field}"),
            None => format!("[{index}]"),
        };
        Self {
            message: format!("Invalid element at index {index}: {}", self.message),
            field: Some(field),
            value: self.value,
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending field path, if known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The offending value, if captured.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{} (field: {field})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for DecodeError {}

/// JSON type name of a value, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialized form of a value, truncated for error messages.
fn snippet(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= 100 {
        rendered
    } else {
        rendered.chars().take(100).collect()
    }
}
