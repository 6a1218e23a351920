use canvas_snake_core::{ScoreStore, ScoreStoreError};

/// Score store kept in memory for tests and headless runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    high_score: Option<u32>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { high_score: None }
    }

    /// Creates a store already holding `high_score`.
    #[must_use]
    pub const fn with_high_score(high_score: u32) -> Self {
        Self {
            high_score: Some(high_score),
        }
    }

    /// Value currently stored, if any.
    #[must_use]
    pub const fn high_score(&self) -> Option<u32> {
        self.high_score
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_high_score(&self) -> Result<Option<u32>, ScoreStoreError> {
        Ok(self.high_score)
    }

    fn store_high_score(&mut self, high_score: u32) -> Result<(), ScoreStoreError> {
        self.high_score = Some(high_score);
        Ok(())
    }
}
