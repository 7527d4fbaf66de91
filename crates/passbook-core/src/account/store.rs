//! Account store: the in-memory working set and its persisted mirror.

use passbook_storage::{
    Backend, MemoryBackend, ReadOptions, Storage, StorageConfig, WriteOptions,
};
use serde_json::Value;
use tracing::{debug, warn};

use super::decode::decode_accounts;
use super::model::Account;
use crate::error::{Error, Result};

/// Storage key holding the persisted account array.
const STORAGE_KEY: &str = "accounts";

/// Stateful list of accounts backed by a [`Storage`] wrapper.
///
/// The store owns the canonical in-memory list; storage holds a JSON array
/// mirror under a single key. Records are addressed positionally, so the
/// two stay aligned by index as long as every mutation goes through the
/// store's actions.
pub struct AccountStore<B: Backend> {
    storage: Storage<B>,
    accounts: Vec<Account>,
    has_unsaved: bool,
}

impl<B: Backend> AccountStore<B> {
    /// Creates a store over `backend`. Call [`init`](Self::init) before use.
    #[must_use]
    pub fn new(backend: B) -> Self {
        let config = StorageConfig {
            on_error: Some(Box::new(|err, operation, _key| {
                warn!("accounts {operation} failed: {err}");
            })),
            strict: false,
        };
        Self {
            storage: Storage::with_config(backend, config),
            accounts: Vec::new(),
            has_unsaved: false,
        }
    }

    /// The current in-memory account list.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Mutable access to the record at `index`, for in-place edits.
    pub fn account_mut(&mut self, index: usize) -> Option<&mut Account> {
        self.accounts.get_mut(index)
    }

    /// Whether the last record was appended by [`add_account`](Self::add_account)
    /// and not yet persisted.
    #[must_use]
    pub const fn has_unsaved_accounts(&self) -> bool {
        self.has_unsaved
    }

    /// Loads the persisted accounts, adopting them as the working set.
    ///
    /// When nothing usable is stored (the key is absent, or its payload
    /// fails structural validation) the corrupted payload, if any, is
    /// removed, an empty array is written and the working set is emptied.
    /// Corruption is logged for diagnostics only. Idempotent.
    pub fn init(&mut self) {
        match self.load_validated() {
            Ok(Some(accounts)) => {
                debug!("loaded {} persisted accounts", accounts.len());
                self.accounts = accounts;
            }
            Ok(None) => self.reset_to_empty(),
            Err(_) => {
                // The hook already logged the failure; drop the corrupted
                // payload so the next load starts clean.
                let _ = self.storage.remove(STORAGE_KEY);
                self.reset_to_empty();
            }
        }
    }

    /// Appends a blank record ([`Account::new`]) to the working set without
    /// persisting it, and marks the store as holding an unsaved account.
    pub fn add_account(&mut self) {
        self.accounts.push(Account::new());
        self.has_unsaved = true;
    }

    /// Persists the in-memory record at `index`.
    ///
    /// The persisted array is re-read, the element at `index` is replaced
    /// (or appended, when `index` is the pending addition one past its end)
    /// and the whole array is written back. On success the unsaved flag is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when `index` is outside the
    /// working set, or beyond the end of the persisted array. Storage
    /// failures during load or write surface as [`Error::Storage`]; the
    /// unsaved flag is left untouched in that case.
    pub fn save_account(&mut self, index: usize) -> Result<()> {
        let account = self
            .accounts
            .get(index)
            .cloned()
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.accounts.len(),
            })?;

        let mut saved = self.load_validated()?.unwrap_or_default();
        if index < saved.len() {
            saved[index] = account;
        } else if index == saved.len() {
            saved.push(account);
        } else {
            return Err(Error::IndexOutOfBounds {
                index,
                len: saved.len(),
            });
        }

        self.storage.set(
            STORAGE_KEY,
            &saved,
            WriteOptions {
                strict: Some(true),
                ..WriteOptions::default()
            },
        )?;

        self.has_unsaved = false;
        debug!("saved account at index {index}");
        Ok(())
    }

    /// Deletes the record at `index` from memory and storage.
    ///
    /// A pending, never-persisted addition (the last record while the
    /// unsaved flag is set) is only dropped from memory; storage is left
    /// untouched. Otherwise the persisted array is re-read, the element is
    /// removed and the array written back before the in-memory record goes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] when `index` is outside the
    /// working set; storage failures surface as [`Error::Storage`].
    pub fn delete_account(&mut self, index: usize) -> Result<()> {
        if index >= self.accounts.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.accounts.len(),
            });
        }

        if index + 1 == self.accounts.len() && self.has_unsaved {
            self.accounts.pop();
            self.has_unsaved = false;
            return Ok(());
        }

        let saved: Option<Vec<Account>> = self.storage.get(STORAGE_KEY, ReadOptions::default())?;
        if let Some(mut saved) = saved {
            if index < saved.len() {
                saved.remove(index);
                self.storage.set(
                    STORAGE_KEY,
                    &saved,
                    WriteOptions {
                        strict: Some(true),
                        ..WriteOptions::default()
                    },
                )?;
            } else {
                warn!("persisted accounts end before index {index}; nothing to remove");
            }
        }

        self.accounts.remove(index);
        debug!("deleted account at index {index}");
        Ok(())
    }

    fn load_validated(&self) -> std::result::Result<Option<Vec<Account>>, passbook_storage::Error> {
        self.storage.get(
            STORAGE_KEY,
            ReadOptions {
                decode: Some(&decode_accounts_json),
                ..ReadOptions::default()
            },
        )
    }

    fn reset_to_empty(&mut self) {
        let _ = self
            .storage
            .set(STORAGE_KEY, &Vec::<Account>::new(), WriteOptions::default());
        self.accounts.clear();
    }
}

impl AccountStore<MemoryBackend> {
    /// Creates a store over an in-memory backend, for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

/// Strict decoder for the persisted array: JSON parse, then structural
/// validation of every record.
fn decode_accounts_json(raw: &str) -> std::result::Result<Vec<Account>, passbook_storage::Error> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(decode_accounts(&value)?)
}
