use serde::{Deserialize, Serialize};

use crate::error::{LotoError, Result};
use crate::models::{check_game_size, MIN_GAME_SIZE};
use crate::selection::{date_seed, DEFAULT_BATCH_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub game_size: usize,
    pub batch_count: usize,
    pub parallel: bool,
    /// Fixed seed for the batch; the date seed (YYYYMMDD) is used when absent.
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            game_size: MIN_GAME_SIZE,
            batch_count: DEFAULT_BATCH_COUNT,
            parallel: true,
            seed: None,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        check_game_size(self.game_size)?;
        if self.batch_count == 0 {
            return Err(LotoError::InvalidBatchCount(self.batch_count));
        }
        Ok(())
    }

    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(date_seed)
    }
}
