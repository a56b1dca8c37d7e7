use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LotoError {
    #[error("Invalid game size {0}: expected between {min} and {max}", min = crate::models::MIN_GAME_SIZE, max = crate::models::MAX_GAME_SIZE)]
    InvalidSize(usize),

    #[error("Degenerate history: {0}")]
    DegenerateHistory(String),

    #[error("Malformed draw: {0}")]
    MalformedDraw(String),

    #[error("Malformed game: {0}")]
    MalformedGame(String),

    #[error("Invalid batch count {0}: at least one candidate is required")]
    InvalidBatchCount(usize),
}

pub type Result<T> = std::result::Result<T, LotoError>;
