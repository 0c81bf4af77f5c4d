//! Client-held quote basket.
//!
//! A [`Basket`] is a set of catalog items keyed by id, written back to its
//! [`BasketStorage`] after every mutation. It is constructed explicitly with
//! the storage it should use; there is no process-wide basket.

pub mod storage;
pub mod submission;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use storage::{BasketStorage, FileBasketStorage, MemoryBasketStorage};
pub use submission::{build_quote_request, submit_basket, ContactForm, SubmitError};

/// Fixed key the basket is stored under.
pub const BASKET_STORAGE_KEY: &str = "quote-basket";

#[derive(Debug, Error)]
pub enum BasketError {
    #[error("Failed to write basket: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode basket: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A catalog item plus the display snapshot taken when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Any other catalog fields (price, category, ...) carried through as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BasketItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// Serialized form written to storage.
pub fn encode(items: &[BasketItem]) -> Result<String, BasketError> {
    Ok(serde_json::to_string(items)?)
}

/// Parses a stored basket. Unparsable text is reported and treated as no basket.
pub fn decode(raw: &str) -> Option<Vec<BasketItem>> {
    match serde_json::from_str::<Vec<BasketItem>>(raw) {
        Ok(items) => Some(items),
        Err(e) => {
            log::warn!("Discarding unreadable stored basket: {}", e);
            None
        }
    }
}

pub struct Basket<S: BasketStorage> {
    storage: S,
    items: Vec<BasketItem>,
    // Idempotency key for the pending submission of the current contents.
    submission_key: Option<String>,
}

impl<S: BasketStorage> Basket<S> {
    /// Restores the basket from `storage`. Missing or corrupt state yields an
    /// empty basket.
    pub fn open(storage: S) -> Self {
        let items = restore(&storage);
        Self {
            storage,
            items,
            submission_key: None,
        }
    }

    /// Adds `item` unless an item with the same id is already present.
    /// Returns whether the basket changed.
    pub fn add(&mut self, item: BasketItem) -> Result<bool, BasketError> {
        if self.contains(&item.id) {
            return Ok(false);
        }
        self.items.push(item);
        self.submission_key = None;
        self.persist()?;
        Ok(true)
    }

    /// Removes the item with `id`. Returns whether the basket changed.
    pub fn remove(&mut self, id: &str) -> Result<bool, BasketError> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.submission_key = None;
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), BasketError> {
        self.items.clear();
        self.submission_key = None;
        self.persist()
    }

    pub fn items(&self) -> &[BasketItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Re-reads storage, picking up changes written by another basket sharing
    /// the same backing store.
    pub fn reload(&mut self) {
        let items = restore(&self.storage);
        if items != self.items {
            self.submission_key = None;
        }
        self.items = items;
    }

    /// Idempotency key for submitting the current contents. Retries of an
    /// unchanged basket get the same key; any change starts a new one.
    pub fn submission_key(&mut self) -> &str {
        self.submission_key
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .as_str()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // The in-memory basket stays authoritative when a write fails; the error
    // is returned so the caller can tell the visitor.
    fn persist(&self) -> Result<(), BasketError> {
        self.storage.save(&self.items).map_err(|e| {
            log::error!("Basket change was not persisted: {}", e);
            e
        })
    }
}

fn restore<S: BasketStorage>(storage: &S) -> Vec<BasketItem> {
    let stored = storage.load().unwrap_or_default();
    let mut items: Vec<BasketItem> = Vec::with_capacity(stored.len());
    for item in stored {
        if items.iter().any(|kept| kept.id == item.id) {
            log::info!("Dropping duplicate stored basket entry {}", item.id);
            continue;
        }
        items.push(item);
    }
    items
}
