//! Provides a growable, name-keyed store of scalar solver state
use std::cell::OnceCell;

use indexmap::IndexMap;
use thiserror::Error;

/// An append-only sequence of (name, value) pairs with name-keyed lookup
///
/// A store starts empty and grows one entry at a time during capture. The
/// first call to [`NamedStateStore::lookup`] builds a name index over the
/// entries appended so far and freezes the store; any later append fails with
/// [`StoreError::AlreadyFrozen`]. Names are expected to be unique within one
/// store (capture appends each session primitive exactly once); if a name
/// repeats, the index resolves it to the last entry appended under it.
///
/// # Examples
/// ```rust
/// use warmstart_core::optimize::warm_start::store::NamedStateStore;
/// let mut store: NamedStateStore<f64> = NamedStateStore::new();
/// store.append("x1", 3.5).unwrap();
/// store.append("x2", -1.0).unwrap();
/// assert_eq!(store.lookup("x2"), Ok(&-1.0));
/// // The lookup froze the store, so appending now fails
/// assert!(store.append("x3", 0.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NamedStateStore<T> {
    /// Entries in append order
    entries: Vec<(String, T)>,
    /// Name index, built once by the first lookup and never mutated after
    index: OnceCell<IndexMap<String, usize>>,
}

impl<T> NamedStateStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: OnceCell::new(),
        }
    }

    /// Create a new empty store with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: OnceCell::new(),
        }
    }

    /// Add one entry to the store
    ///
    /// Fails with [`StoreError::AlreadyFrozen`] if any lookup has already been
    /// performed on this store.
    pub fn append(&mut self, name: impl Into<String>, value: T) -> Result<(), StoreError> {
        if self.is_frozen() {
            return Err(StoreError::AlreadyFrozen);
        }
        self.entries.push((name.into(), value));
        Ok(())
    }

    /// Look up a value by name, freezing the store on the first call
    ///
    /// The name index is built once, in O(n), the first time this is called.
    /// Fails with [`StoreError::NameNotFound`] if no entry has this name.
    pub fn lookup(&self, name: &str) -> Result<&T, StoreError> {
        let index = self.index.get_or_init(|| {
            self.entries
                .iter()
                .enumerate()
                .map(|(position, (name, _))| (name.clone(), position))
                .collect()
        });
        match index.get(name) {
            Some(&position) => Ok(&self.entries[position].1),
            None => Err(StoreError::NameNotFound(name.to_string())),
        }
    }

    /// Read-only view of the entries in append order, valid frozen or not
    pub fn entries(&self) -> &[(String, T)] {
        &self.entries
    }

    /// Number of entries in the store
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a lookup has already frozen this store
    pub fn is_frozen(&self) -> bool {
        self.index.get().is_some()
    }
}

impl<T> Default for NamedStateStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two stores are equal when they hold the same entries in the same order;
/// whether either has been frozen does not affect equality
impl<T: PartialEq> PartialEq for NamedStateStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Errors associated with a NamedStateStore
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Error when trying to append after a lookup has frozen the store
    #[error("Tried to append to a store already frozen by a lookup")]
    AlreadyFrozen,
    /// Error when looking up a name with no entry
    #[error("No entry named {0} in the store")]
    NameNotFound(String),
}
