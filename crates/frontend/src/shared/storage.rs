//! Хранилища ключ-значение.
//!
//! Каталог сохраняет две JSON-записи. В браузере они лежат в `localStorage`,
//! в тестах и вне браузера используется [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::HashMap;

use super::error::StorageError;

/// Синхронное строковое хранилище с контрактом `localStorage`
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))?;
        Ok(Self { inner })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::ReadFailed {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // сюда попадает QuotaExceededError
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }
}

/// Хранилище в памяти с необязательной квотой на размер значений (в байтах)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запись отклоняется, если суммарный размер значений превысит `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: format!("quota of {} bytes exceeded", quota),
                });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
