//! String-keyed value store.
//!
//! [`Dictionary`] backs the per-container global store and the runtime
//! directory. It is a small associative store with explicit duplicate
//! handling: `add` refuses an existing key, `update` upserts. Iteration
//! order (`keys`, `list`) is insertion order.
//!
//! # Thread Safety
//!
//! The store locks internally; all methods take `&self`. Values are cloned
//! out on read, so no lock is held while a caller inspects a value.
//!
//! # Example
//!
//! ```
//! use trellis_types::Dictionary;
//!
//! let store: Dictionary<i64> = Dictionary::new();
//! store.add("retries", 3).unwrap();
//! assert_eq!(store.get("retries").unwrap(), Some(3));
//! assert!(store.add("retries", 5).is_err());  // keys are unique
//! store.update("retries", 5).unwrap();        // upsert
//! assert_eq!(store.count(), 1);
//! ```

use crate::ErrorCode;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Store layer error.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | [`EmptyKey`](DictionaryError::EmptyKey) | `DICT_EMPTY_KEY` | No |
/// | [`DuplicateKey`](DictionaryError::DuplicateKey) | `DICT_DUPLICATE_KEY` | No |
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DictionaryError {
    /// A key was empty where a key is required.
    ///
    /// **Not recoverable** - the caller must supply a key.
    #[error("store key must not be empty")]
    EmptyKey,

    /// `add` was called for a key that already exists.
    ///
    /// The existing entry is left untouched. Use
    /// [`update`](Dictionary::update) to overwrite.
    ///
    /// **Not recoverable** - same key will keep colliding.
    #[error("store key already exists: {0}")]
    DuplicateKey(String),
}

impl ErrorCode for DictionaryError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyKey => "DICT_EMPTY_KEY",
            Self::DuplicateKey(_) => "DICT_DUPLICATE_KEY",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct Entries<V> {
    values: HashMap<String, V>,
    // Insertion order of live keys; kept in sync with `values`.
    order: Vec<String>,
}

/// String-keyed value store with unique keys.
///
/// See the [module docs](self) for the contract.
#[derive(Debug)]
pub struct Dictionary<V> {
    entries: RwLock<Entries<V>>,
}

impl<V: Clone> Dictionary<V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                values: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Adds a new entry.
    ///
    /// # Errors
    ///
    /// - [`DictionaryError::EmptyKey`] if `key` is empty
    /// - [`DictionaryError::DuplicateKey`] if `key` already exists; the
    ///   existing value stays in place
    pub fn add(&self, key: impl Into<String>, value: V) -> Result<(), DictionaryError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DictionaryError::EmptyKey);
        }

        let mut entries = self.entries.write();
        if entries.values.contains_key(&key) {
            return Err(DictionaryError::DuplicateKey(key));
        }
        entries.order.push(key.clone());
        entries.values.insert(key, value);
        Ok(())
    }

    /// Inserts or overwrites an entry.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::EmptyKey`] if `key` is empty.
    pub fn update(&self, key: impl Into<String>, value: V) -> Result<(), DictionaryError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DictionaryError::EmptyKey);
        }

        let mut entries = self.entries.write();
        if entries.values.insert(key.clone(), value).is_none() {
            entries.order.push(key);
        }
        Ok(())
    }

    /// Returns a clone of the value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::EmptyKey`] if `key` is empty: looking up
    /// nothing is a caller bug, not a miss.
    pub fn get(&self, key: &str) -> Result<Option<V>, DictionaryError> {
        if key.is_empty() {
            return Err(DictionaryError::EmptyKey);
        }
        Ok(self.entries.read().values.get(key).cloned())
    }

    /// Returns `true` if `key` exists. An empty key exists nowhere.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        !key.is_empty() && self.entries.read().values.contains_key(key)
    }

    /// Removes and returns the entry for `key`, if present.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write();
        let removed = entries.values.remove(key);
        if removed.is_some() {
            entries.order.retain(|k| k != key);
        }
        removed
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.read().values.len()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.values.clear();
        entries.order.clear();
    }

    /// Returns all values in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<V> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|key| entries.values.get(key).cloned())
            .collect()
    }

    /// Returns all keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().order.clone()
    }
}

impl<V: Clone> Default for Dictionary<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_error_codes;

    #[test]
    fn add_get_round_trip() {
        let store: Dictionary<&str> = Dictionary::new();
        store.add("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap(), Some("dark"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn add_refuses_duplicate_and_keeps_first() {
        let store: Dictionary<i32> = Dictionary::new();
        store.add("k", 1).unwrap();

        let err = store.add("k", 2).unwrap_err();
        assert_eq!(err, DictionaryError::DuplicateKey("k".into()));
        assert_eq!(store.get("k").unwrap(), Some(1));
    }

    #[test]
    fn update_upserts() {
        let store: Dictionary<i32> = Dictionary::new();
        store.update("k", 1).unwrap();
        store.update("k", 2).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(2));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn empty_key_fails() {
        let store: Dictionary<i32> = Dictionary::new();
        assert_eq!(store.add("", 1), Err(DictionaryError::EmptyKey));
        assert_eq!(store.update("", 1), Err(DictionaryError::EmptyKey));
        assert_eq!(store.get(""), Err(DictionaryError::EmptyKey));
        assert!(!store.has(""));
    }

    #[test]
    fn has_remove_count_clear() {
        let store: Dictionary<i32> = Dictionary::new();
        store.add("a", 1).unwrap();
        store.add("b", 2).unwrap();

        assert!(store.has("a"));
        assert_eq!(store.remove("a"), Some(1));
        assert!(!store.has("a"));
        assert_eq!(store.remove("a"), None);
        assert_eq!(store.count(), 1);

        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn list_and_keys_preserve_insertion_order() {
        let store: Dictionary<i32> = Dictionary::new();
        store.add("c", 3).unwrap();
        store.add("a", 1).unwrap();
        store.add("b", 2).unwrap();
        store.remove("a");
        store.add("a", 9).unwrap();

        assert_eq!(store.keys(), vec!["c", "b", "a"]);
        assert_eq!(store.list(), vec![3, 2, 9]);
    }

    #[test]
    fn error_codes_valid() {
        assert_error_codes(
            &[
                DictionaryError::EmptyKey,
                DictionaryError::DuplicateKey("k".into()),
            ],
            "DICT_",
        );
    }
}
