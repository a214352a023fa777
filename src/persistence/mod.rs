//! Best-score persistence
//!
//! The only thing the game ever stores is one non-negative integer, kept as a
//! decimal string under a single key. Reads happen once at startup; writes
//! happen whenever the best score is beaten.

use std::fmt;

#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage failure. Never fatal: the in-memory best score stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend is available (private mode, no window)
    Unavailable,
    /// The backend refused the write
    WriteFailed(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::WriteFailed(reason) => write!(f, "storage write failed: {}", reason),
        }
    }
}

impl std::error::Error for StorageError {}

/// Key-value storage for the best score
pub trait ScoreStore {
    /// Raw stored value, if any
    fn read(&self) -> Option<String>;
    /// Store the raw value
    fn write(&mut self, value: &str) -> Result<(), StorageError>;

    /// Stored best score, defaulting to 0 when absent or invalid
    fn load_best(&self) -> u32 {
        parse_best(self.read().as_deref())
    }

    /// Persist a best score; failures are logged and otherwise ignored
    fn save_best(&mut self, best: u32) {
        if let Err(e) = self.write(&best.to_string()) {
            log::warn!("Could not persist best score {}: {}", best, e);
        }
    }
}

/// Coerce a stored value into a best score. Accepts integer and numeric
/// strings (including "12.0"); anything negative, non-finite, or unparsable
/// becomes 0.
pub fn parse_best(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    if let Ok(value) = raw.parse::<u32>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}
