//! Cart persistence
//!
//! A cart is persisted as a JSON array of items in a single key-value slot. Loading is
//! fail-open: anything that cannot be read back yields an empty cart.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::CartItem,
    persistence::records::CartItemRecord,
    storage::{KeyValueStore, StorageError},
};

mod records;

/// Key of the slot holding the cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors raised while encoding, decoding or storing a cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// JSON encoding or decoding error
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored price uses a currency this crate does not know
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Underlying storage error
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Loads and saves the full item sequence of a cart.
pub trait CartPersistence {
    /// Load the persisted items. Returns an empty list if nothing usable is stored.
    fn load(&self) -> Vec<CartItem>;

    /// Replace the persisted items with `items`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the items cannot be encoded or written.
    fn save(&mut self, items: &[CartItem]) -> Result<(), PersistenceError>;
}

/// Encode items as the JSON slot value.
///
/// # Errors
///
/// Returns [`PersistenceError::Json`] if encoding fails.
pub fn encode_items(items: &[CartItem]) -> Result<String, PersistenceError> {
    let records: Vec<CartItemRecord> = items.iter().map(CartItemRecord::from).collect();

    Ok(serde_json::to_string(&records)?)
}

/// Decode items from a JSON slot value.
///
/// # Errors
///
/// Returns [`PersistenceError::Json`] if the value is not a valid item array, or
/// [`PersistenceError::UnknownCurrency`] if an item is priced in an unknown currency.
pub fn decode_items(value: &str) -> Result<Vec<CartItem>, PersistenceError> {
    let records: Vec<CartItemRecord> = serde_json::from_str(value)?;

    records.into_iter().map(CartItem::try_from).collect()
}

/// Persists a cart as JSON in a [`KeyValueStore`] slot.
#[derive(Debug, Clone)]
pub struct KeyValueCartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueCartPersistence<S> {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key of the slot in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume and return the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn try_load(&self) -> Result<Vec<CartItem>, PersistenceError> {
        match self.store.get(&self.key)? {
            Some(value) => decode_items(&value),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: KeyValueStore> CartPersistence for KeyValueCartPersistence<S> {
    fn load(&self) -> Vec<CartItem> {
        self.try_load().unwrap_or_else(|err| {
            warn!(key = %self.key, error = %err, "discarding unreadable cart");

            Vec::new()
        })
    }

    fn save(&mut self, items: &[CartItem]) -> Result<(), PersistenceError> {
        let value = encode_items(items)?;

        self.store.set(&self.key, value)?;

        debug!(key = %self.key, items = items.len(), "saved cart");

        Ok(())
    }
}
