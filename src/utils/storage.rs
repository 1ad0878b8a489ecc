// ============================================================================
// STORAGE - Almacenamiento clave/valor (localStorage o memoria)
// ============================================================================

use gloo_storage::{LocalStorage, Storage as _};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use web_sys::{window, Storage};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("No se pudo acceder a localStorage")]
    Unavailable,
    #[error("Error guardando '{key}' en storage: {message}")]
    Write { key: String, message: String },
}

/// Backend clave/valor donde vive el estado persistido del cliente
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// localStorage del navegador. Los valores se guardan en crudo (el token no
/// lleva comillas JSON) para ser compatibles con sesiones ya existentes.
#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// `None` si localStorage está bloqueado (modo privado, iframe sandbox...)
    pub fn detect() -> Option<Self> {
        get_local_storage().map(|_| BrowserStorage)
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// Storage en memoria: fallback cuando no hay localStorage y backend de tests
#[derive(Clone, Default, Debug)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    failing_key: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hace fallar las escrituras de una clave (simula cuota excedida)
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.borrow_mut() = Some(key.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_key.borrow().as_deref() == Some(key) {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "QuotaExceededError".to_string(),
            });
        }
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Storage del navegador o, si no está disponible, uno en memoria
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    match BrowserStorage::detect() {
        Some(storage) => Rc::new(storage),
        None => {
            log::warn!("⚠️ [STORAGE] localStorage no disponible, la sesión no sobrevivirá a recargas");
            Rc::new(MemoryStorage::new())
        }
    }
}
