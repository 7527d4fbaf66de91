//! Typed storage wrapper over a raw key/value backend.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::backend::Backend;
use crate::error::{DecodeError, Error};

/// Custom deserializer from the raw stored string.
pub type DecodeFn<T> = dyn Fn(&str) -> Result<T, Error>;

/// Custom serializer to the raw stored string.
pub type EncodeFn<T> = dyn Fn(&T) -> Result<String, Error>;

/// Semantic validator applied to a decoded value before it is returned, or
/// to a value before it is written.
pub type ValidateFn<T> = dyn Fn(&T) -> Result<(), DecodeError>;

/// Hook invoked when a storage operation fails.
///
/// Receives the error, the failed operation and the key involved (absent for
/// [`Operation::Clear`]). Hooks observe failures; they do not change whether
/// the error is swallowed or surfaced.
pub type ErrorHook = Box<dyn Fn(&Error, Operation, Option<&str>)>;

/// Storage operation kind, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read of a single key.
    Get,
    /// Write of a single key.
    Set,
    /// Removal of a single key.
    Remove,
    /// Removal of every key.
    Clear,
}

impl Operation {
    /// Lowercase operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Instance-wide storage policy.
///
/// Holds the fields that apply regardless of the stored type. Type-bearing
/// concerns (fallback value, codec, validator) are supplied per call through
/// [`ReadOptions`] and [`WriteOptions`].
#[derive(Default)]
pub struct StorageConfig {
    /// Hook invoked on any failed operation. `None` logs via
    /// [`log_storage_error`].
    pub on_error: Option<ErrorHook>,
    /// Whether write-side operations (`set`, `remove`, `clear`) surface
    /// errors instead of swallowing them. Reads ignore this: a read is
    /// always strict when no fallback value exists.
    pub strict: bool,
}

/// Per-call options for [`Storage::get`].
pub struct ReadOptions<'a, T> {
    /// Value returned when the key is absent, or after a failure.
    pub default: Option<T>,
    /// Custom deserializer; defaults to [`serde_json::from_str`].
    pub decode: Option<&'a DecodeFn<T>>,
    /// Semantic validator applied to the decoded value.
    pub validate: Option<&'a ValidateFn<T>>,
}

impl<T> Default for ReadOptions<'_, T> {
    fn default() -> Self {
        Self {
            default: None,
            decode: None,
            validate: None,
        }
    }
}

/// Per-call options for [`Storage::set`].
pub struct WriteOptions<'a, T> {
    /// Validator applied to the value before it is serialized.
    pub validate: Option<&'a ValidateFn<T>>,
    /// Custom serializer; defaults to [`serde_json::to_string`].
    pub encode: Option<&'a EncodeFn<T>>,
    /// Overrides the instance-wide strict flag for this call.
    pub strict: Option<bool>,
}

impl<T> Default for WriteOptions<'_, T> {
    fn default() -> Self {
        Self {
            validate: None,
            encode: None,
            strict: None,
        }
    }
}

/// Safe, typed wrapper over a raw key/value [`Backend`].
///
/// Reads return a supplied fallback instead of failing where one exists;
/// writes are best-effort unless strict propagation is requested. Every
/// failure is routed through the configured error hook first.
pub struct Storage<B> {
    backend: B,
    config: StorageConfig,
}

impl<B: Backend> Storage<B> {
    /// Creates a wrapper with the default configuration.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StorageConfig::default())
    }

    /// Creates a wrapper with the given configuration.
    #[must_use]
    pub fn with_config(backend: B, config: StorageConfig) -> Self {
        Self { backend, config }
    }

    /// Replaces the instance configuration. Affects all subsequent calls
    /// that do not override a field per call.
    pub fn configure(&mut self, config: StorageConfig) {
        self.config = config;
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads and decodes the value stored at `key`.
    ///
    /// An absent key yields the fallback from `options.default`, or `None`.
    /// A present key is decoded (custom decoder or JSON) and then checked by
    /// the validator, if one is given.
    ///
    /// # Errors
    ///
    /// On any read, decode or validation failure the error hook runs; the
    /// fallback is returned if one was supplied, otherwise the original
    /// error surfaces.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
        options: ReadOptions<'_, T>,
    ) -> Result<Option<T>, Error> {
        let ReadOptions {
            default,
            decode,
            validate,
        } = options;

        match self.try_get(key, decode, validate) {
            Ok(None) => Ok(default),
            Ok(found) => Ok(found),
            Err(err) => {
                self.report(&err, Operation::Get, Some(key));
                match default {
                    Some(fallback) => Ok(Some(fallback)),
                    None => Err(err),
                }
            }
        }
    }

    fn try_get<T: DeserializeOwned>(
        &self,
        key: &str,
        decode: Option<&DecodeFn<T>>,
        validate: Option<&ValidateFn<T>>,
    ) -> Result<Option<T>, Error> {
        let Some(raw) = self.backend.read(key)? else {
            return Ok(None);
        };

        let value = match decode {
            Some(decode) => decode(&raw)?,
            None => serde_json::from_str(&raw)?,
        };

        if let Some(validate) = validate {
            validate(&value)?;
        }

        Ok(Some(value))
    }

    /// Validates, serializes and writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// On failure the error hook runs; the error surfaces only when strict
    /// mode was requested for this call or configured on the instance.
    pub fn set<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        options: WriteOptions<'_, T>,
    ) -> Result<(), Error> {
        let WriteOptions {
            validate,
            encode,
            strict,
        } = options;

        if let Err(err) = self.try_set(key, value, validate, encode) {
            self.report(&err, Operation::Set, Some(key));
            if strict.unwrap_or(self.config.strict) {
                return Err(err);
            }
        }
        Ok(())
    }

    fn try_set<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        validate: Option<&ValidateFn<T>>,
        encode: Option<&EncodeFn<T>>,
    ) -> Result<(), Error> {
        if let Some(validate) = validate {
            validate(value)?;
        }

        let raw = match encode {
            Some(encode) => encode(value)?,
            None => serde_json::to_string(value)?,
        };

        self.backend.write(key, &raw)?;
        Ok(())
    }

    /// Best-effort removal of `key`.
    ///
    /// # Errors
    ///
    /// Surfaces the error only when the instance configuration is strict;
    /// the error hook runs either way.
    pub fn remove(&mut self, key: &str) -> Result<(), Error> {
        if let Err(err) = self.backend.delete(key).map_err(Error::from) {
            self.report(&err, Operation::Remove, Some(key));
            if self.config.strict {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Best-effort removal of every key.
    ///
    /// # Errors
    ///
    /// Surfaces the error only when the instance configuration is strict;
    /// the error hook runs either way.
    pub fn clear(&mut self) -> Result<(), Error> {
        if let Err(err) = self.backend.clear().map_err(Error::from) {
            self.report(&err, Operation::Clear, None);
            if self.config.strict {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Whether `key` currently holds a value. Never fails; any error reads
    /// as absent.
    pub fn has(&self, key: &str) -> bool {
        matches!(self.backend.read(key), Ok(Some(_)))
    }

    /// Every stored key. Never fails; any error reads as no keys.
    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_default()
    }

    fn report(&self, error: &Error, operation: Operation, key: Option<&str>) {
        match &self.config.on_error {
            Some(hook) => hook(error, operation, key),
            None => log_storage_error(error, operation, key),
        }
    }
}

/// Default error handler: logs the failure for diagnostics.
pub fn log_storage_error(error: &Error, operation: Operation, key: Option<&str>) {
    match key {
        Some(key) => error!("storage {operation} failed for key \"{key}\": {error}"),
        None => error!("storage {operation} failed: {error}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    use proptest::prelude::*;
    use serde_json::Value;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::value::expect_string;

    /// Backend where every operation fails, for exercising error routing.
    struct FailingBackend;

    impl Backend for FailingBackend {
        fn read(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("storage is not available"))
        }

        fn write(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::other("storage is not available"))
        }

        fn delete(&mut self, _key: &str) -> io::Result<()> {
            Err(io::Error::other("storage is not available"))
        }

        fn clear(&mut self) -> io::Result<()> {
            Err(io::Error::other("storage is not available"))
        }

        fn keys(&self) -> io::Result<Vec<String>> {
            Err(io::Error::other("storage is not available"))
        }
    }

    fn counting_hook() -> (StorageConfig, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let config = StorageConfig {
            on_error: Some(Box::new(move |_err, _op, _key| {
                seen.set(seen.get() + 1);
            })),
            strict: false,
        };
        (config, calls)
    }

    #[test]
    fn get_missing_key_returns_none() {
        let storage = Storage::new(MemoryBackend::new());
        let loaded: Option<String> = storage.get("missing", ReadOptions::default()).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn get_missing_key_returns_default() {
        let storage = Storage::new(MemoryBackend::new());
        let loaded: Option<u32> = storage
            .get(
                "missing",
                ReadOptions {
                    default: Some(7),
                    ..ReadOptions::default()
                },
            )
            .unwrap();
        assert_eq!(loaded, Some(7));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage
            .set("numbers", &vec![1, 2, 3], WriteOptions::default())
            .unwrap();
        let loaded: Option<Vec<i32>> = storage.get("numbers", ReadOptions::default()).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn get_corrupt_payload_without_default_surfaces_error() {
        let mut backend = MemoryBackend::new();
        backend.write("bad", "{not json").unwrap();
        let (config, calls) = counting_hook();
        let storage = Storage::with_config(backend, config);

        let result: Result<Option<Value>, Error> = storage.get("bad", ReadOptions::default());
        assert!(matches!(result, Err(Error::Json(_))));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn get_corrupt_payload_with_default_falls_back() {
        let mut backend = MemoryBackend::new();
        backend.write("bad", "{not json").unwrap();
        let (config, calls) = counting_hook();
        let storage = Storage::with_config(backend, config);

        let loaded: Option<String> = storage
            .get(
                "bad",
                ReadOptions {
                    default: Some("fallback".to_string()),
                    ..ReadOptions::default()
                },
            )
            .unwrap();
        assert_eq!(loaded, Some("fallback".to_string()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn get_type_mismatch_fails_without_default() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage.set("word", &"hello", WriteOptions::default()).unwrap();

        let result: Result<Option<u32>, Error> = storage.get("word", ReadOptions::default());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn get_rejected_by_validator_falls_back_to_default() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage.set("word", &"hello", WriteOptions::default()).unwrap();

        let reject = |_value: &String| -> Result<(), DecodeError> {
            Err(DecodeError::new("Value failed validation"))
        };
        let loaded: Option<String> = storage
            .get(
                "word",
                ReadOptions {
                    default: Some("safe".to_string()),
                    validate: Some(&reject),
                    ..ReadOptions::default()
                },
            )
            .unwrap();
        assert_eq!(loaded, Some("safe".to_string()));
    }

    #[test]
    fn get_uses_custom_decoder() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage.set("shout", &"hey", WriteOptions::default()).unwrap();

        let upper = |raw: &str| -> Result<String, Error> {
            let value: Value = serde_json::from_str(raw)?;
            Ok(expect_string(&value)?.to_uppercase())
        };
        let loaded: Option<String> = storage
            .get(
                "shout",
                ReadOptions {
                    decode: Some(&upper),
                    ..ReadOptions::default()
                },
            )
            .unwrap();
        assert_eq!(loaded, Some("HEY".to_string()));
    }

    #[test]
    fn set_uses_custom_encoder() {
        let mut storage = Storage::new(MemoryBackend::new());
        let encode = |value: &u32| -> Result<String, Error> { Ok(format!("\"{value:08}\"")) };
        storage
            .set(
                "padded",
                &42,
                WriteOptions {
                    encode: Some(&encode),
                    ..WriteOptions::default()
                },
            )
            .unwrap();

        let loaded: Option<String> = storage.get("padded", ReadOptions::default()).unwrap();
        assert_eq!(loaded, Some("00000042".to_string()));
    }

    #[test]
    fn set_rejected_by_validator_is_swallowed_by_default() {
        let (config, calls) = counting_hook();
        let mut storage = Storage::with_config(MemoryBackend::new(), config);

        let reject = |_value: &u32| -> Result<(), DecodeError> {
            Err(DecodeError::new("Value failed validation"))
        };
        let result = storage.set(
            "checked",
            &1,
            WriteOptions {
                validate: Some(&reject),
                ..WriteOptions::default()
            },
        );
        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
        assert!(!storage.has("checked"));
    }

    #[test]
    fn set_rejected_by_validator_surfaces_when_strict() {
        let mut storage = Storage::new(MemoryBackend::new());
        let reject = |_value: &u32| -> Result<(), DecodeError> {
            Err(DecodeError::new("Value failed validation"))
        };
        let result = storage.set(
            "checked",
            &1,
            WriteOptions {
                validate: Some(&reject),
                strict: Some(true),
                ..WriteOptions::default()
            },
        );
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn set_failure_is_swallowed_unless_strict() {
        let (config, calls) = counting_hook();
        let mut storage = Storage::with_config(FailingBackend, config);

        assert!(storage.set("k", &1, WriteOptions::default()).is_ok());
        assert_eq!(calls.get(), 1);

        let strict = storage.set(
            "k",
            &1,
            WriteOptions {
                strict: Some(true),
                ..WriteOptions::default()
            },
        );
        assert!(matches!(strict, Err(Error::Io(_))));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn instance_strict_applies_to_writes() {
        let mut storage = Storage::with_config(
            FailingBackend,
            StorageConfig {
                on_error: Some(Box::new(|_, _, _| {})),
                strict: true,
            },
        );
        assert!(storage.set("k", &1, WriteOptions::default()).is_err());
        assert!(storage.remove("k").is_err());
        assert!(storage.clear().is_err());
    }

    #[test]
    fn remove_and_clear_are_best_effort_by_default() {
        let (config, calls) = counting_hook();
        let mut storage = Storage::with_config(FailingBackend, config);
        assert!(storage.remove("k").is_ok());
        assert!(storage.clear().is_ok());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn has_and_keys_never_fail() {
        let storage = Storage::new(FailingBackend);
        assert!(!storage.has("k"));
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn has_reflects_stored_keys() {
        let mut storage = Storage::new(MemoryBackend::new());
        assert!(!storage.has("k"));
        storage.set("k", &1, WriteOptions::default()).unwrap();
        assert!(storage.has("k"));
        storage.remove("k").unwrap();
        assert!(!storage.has("k"));
    }

    #[test]
    fn keys_lists_stored_keys() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage.set("b", &1, WriteOptions::default()).unwrap();
        storage.set("a", &2, WriteOptions::default()).unwrap();
        assert_eq!(storage.keys(), vec!["a".to_string(), "b".to_string()]);
        storage.clear().unwrap();
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn configure_replaces_the_instance_config() {
        let mut storage = Storage::new(FailingBackend);
        assert!(storage.remove("k").is_ok());

        storage.configure(StorageConfig {
            on_error: Some(Box::new(|_, _, _| {})),
            strict: true,
        });
        assert!(storage.remove("k").is_err());
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::Get.to_string(), "get");
        assert_eq!(Operation::Set.to_string(), "set");
        assert_eq!(Operation::Remove.to_string(), "remove");
        assert_eq!(Operation::Clear.to_string(), "clear");
    }

    proptest! {
        // get(key) after set(key, v) returns a value structurally equal to v.
        #[test]
        fn round_trip_law(value in any::<String>()) {
            let mut storage = Storage::new(MemoryBackend::new());
            storage.set("key", &value, WriteOptions::default()).unwrap();
            let loaded: Option<String> = storage.get("key", ReadOptions::default()).unwrap();
            prop_assert_eq!(loaded, Some(value));
        }
    }
}
