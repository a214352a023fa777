//! Score keeping
//!
//! Tracks the current run's score and the best score across runs. The best
//! score is loaded once from a [`ScoreStore`] and written back every time it
//! is beaten.

use serde::{Deserialize, Serialize};

use crate::persistence::ScoreStore;

/// Current and best score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u32,
    best: u32,
}

impl ScoreKeeper {
    /// Keeper seeded with the stored best score
    pub fn load(store: &dyn ScoreStore) -> Self {
        let best = store.load_best();
        log::info!("Loaded best score: {}", best);
        Self { score: 0, best }
    }

    pub fn with_best(best: u32) -> Self {
        Self { score: 0, best }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Add one point. Returns true if this set a new best, which is persisted
    /// immediately.
    pub fn award(&mut self, store: &mut dyn ScoreStore) -> bool {
        self.score += 1;
        if self.score > self.best {
            self.best = self.score;
            store.save_best(self.best);
            return true;
        }
        false
    }

    /// Start a new run; the best score is kept
    pub fn reset(&mut self) {
        self.score = 0;
    }
}
