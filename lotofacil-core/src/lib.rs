pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod models;
pub mod selection;

pub use analysis::{analyze_history, analyze_history_ordered, HistoricalMetrics};
pub use error::{LotoError, Result};
pub use evaluator::{evaluate_game, GameAnalysis};
pub use generator::{generate_game, generate_game_with_rng};
pub use models::{Draw, DrawOrder, Game};
pub use selection::{pick_best, pick_best_with_config};
