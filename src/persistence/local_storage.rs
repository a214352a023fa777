//! LocalStorage-backed best score

use super::{ScoreStore, StorageError};
use crate::consts::BEST_SCORE_KEY;

/// Best score kept in the browser's LocalStorage
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - best score will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for LocalStorageStore {
    fn read(&self) -> Option<String> {
        self.storage.as_ref()?.get_item(BEST_SCORE_KEY).ok().flatten()
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(BEST_SCORE_KEY, value)
            .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
    }
}
