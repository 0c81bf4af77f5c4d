use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{decode, encode, BasketError, BasketItem, BASKET_STORAGE_KEY};

/// Durable backing store for a basket.
pub trait BasketStorage {
    /// Stored items, or `None` when nothing usable is stored.
    fn load(&self) -> Option<Vec<BasketItem>>;
    fn save(&self, items: &[BasketItem]) -> Result<(), BasketError>;
}

impl<T: BasketStorage + ?Sized> BasketStorage for &T {
    fn load(&self) -> Option<Vec<BasketItem>> {
        (**self).load()
    }

    fn save(&self, items: &[BasketItem]) -> Result<(), BasketError> {
        (**self).save(items)
    }
}

/// Stores the basket as a JSON document named after the basket key inside a
/// directory.
#[derive(Debug, Clone)]
pub struct FileBasketStorage {
    path: PathBuf,
}

impl FileBasketStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", BASKET_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BasketStorage for FileBasketStorage {
    fn load(&self) -> Option<Vec<BasketItem>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Could not read basket at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, items: &[BasketItem]) -> Result<(), BasketError> {
        let raw = encode(items)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        // Write then rename so a crash never leaves a half-written basket.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process storage holding the serialized text, as a browser's local
/// storage would.
#[derive(Debug, Default)]
pub struct MemoryBasketStorage {
    raw: RefCell<Option<String>>,
}

impl MemoryBasketStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from arbitrary stored text, e.g. a corrupt payload.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.raw.borrow_mut() = Some(raw.into());
    }
}

impl BasketStorage for MemoryBasketStorage {
    fn load(&self) -> Option<Vec<BasketItem>> {
        self.raw.borrow().as_deref().and_then(decode)
    }

    fn save(&self, items: &[BasketItem]) -> Result<(), BasketError> {
        *self.raw.borrow_mut() = Some(encode(items)?);
        Ok(())
    }
}
