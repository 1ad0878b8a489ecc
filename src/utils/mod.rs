// Utils compartidos

pub mod constants;
pub mod format;
pub mod storage;

pub use constants::*;
pub use format::*;
pub use storage::{default_storage, BrowserStorage, KeyValueStorage, MemoryStorage, StorageError};
