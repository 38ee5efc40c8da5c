use std::cell::RefCell;
use std::collections::HashMap;

use crate::errors::StorageError;

/// Default storage key holding the session token.
pub const DEFAULT_SESSION_KEY: &str = "mintobot_session_id";

/// Key/value storage the session token lives in.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`. Looked up on every access: the getter itself throws
/// in sandboxed frames and when the user disabled site data.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl StorageBackend for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("{e:?}"),
        })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("{e:?}"),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?.remove_item(key).map_err(|e| StorageError::Remove {
            key: key.to_string(),
            message: format!("{e:?}"),
        })
    }
}

/// In-memory storage, for embedders that want no persistence across reloads.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Where a mounted widget keeps its session token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Persistence {
    /// `localStorage`: the conversation survives reloads.
    #[default]
    Browser,
    /// Page memory: every load starts a fresh conversation.
    Memory,
}

/// The backend behind a mounted widget, chosen by [`Persistence`].
#[derive(Debug)]
pub enum WidgetStorage {
    Browser(BrowserStorage),
    Memory(MemoryStorage),
}

impl WidgetStorage {
    pub fn new(persistence: Persistence) -> Self {
        match persistence {
            Persistence::Browser => WidgetStorage::Browser(BrowserStorage),
            Persistence::Memory => WidgetStorage::Memory(MemoryStorage::new()),
        }
    }

    fn backend(&self) -> &dyn StorageBackend {
        match self {
            WidgetStorage::Browser(storage) => storage,
            WidgetStorage::Memory(storage) => storage,
        }
    }
}

impl StorageBackend for WidgetStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend().read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend().write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend().remove(key)
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::rc::Rc<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Persists the single session token. Every operation is best effort: a
/// storage failure means the next page load starts a fresh conversation,
/// never an error in the widget.
pub struct SessionStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    /// The stored token, or an empty string when none is stored or storage
    /// cannot be read.
    pub fn get(&self) -> String {
        match self.backend.read(&self.key) {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                log::debug!("Session token not readable: {e}");
                String::new()
            }
        }
    }

    /// The stored token as it goes on the wire: `None` when empty.
    pub fn token(&self) -> Option<String> {
        Some(self.get()).filter(|token| !token.is_empty())
    }

    pub fn set(&self, token: &str) {
        if let Err(e) = self.backend.write(&self.key, token) {
            log::debug!("Session token not persisted: {e}");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            log::debug!("Session token not cleared: {e}");
        }
    }
}
