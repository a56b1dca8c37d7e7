use serde::Serialize;

use crate::analysis::HistoricalMetrics;
use crate::models::{range_counts, range_label, Game, ParitySplit, RANGE_COUNT};

/// A number drawn more often than this is "hot".
pub const HOT_FREQUENCY_THRESHOLD: u32 = 35;
/// A number absent for more draws than this is "cold".
pub const COLD_DELAY_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCount {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    pub game: Game,
    pub evens: usize,
    pub odds: usize,
    pub ranges: [usize; RANGE_COUNT],
    pub sequence_count: usize,
    pub avg_score: f64,
    pub hot_numbers: usize,
    pub cold_numbers: usize,
}

impl GameAnalysis {
    pub fn parity(&self) -> ParitySplit {
        ParitySplit {
            evens: self.evens,
            odds: self.odds,
        }
    }

    pub fn labeled_ranges(&self) -> Vec<RangeCount> {
        self.ranges
            .iter()
            .enumerate()
            .map(|(i, &count)| RangeCount {
                range: range_label(i),
                count,
            })
            .collect()
    }
}

pub fn evaluate_game(game: &Game, metrics: &HistoricalMetrics) -> GameAnalysis {
    let numbers = game.numbers();
    let ParitySplit { evens, odds } = ParitySplit::of(numbers);

    let sequence_count = metrics
        .sequences()
        .iter()
        .filter(|s| s.sequence.iter().all(|&n| game.contains(n)))
        .count();

    let total: f64 = numbers.iter().map(|&n| metrics.score(n)).sum();
    let avg_score = if numbers.is_empty() {
        0.0
    } else {
        total / numbers.len() as f64
    };

    let hot_numbers = numbers
        .iter()
        .filter(|&&n| metrics.frequency(n) > HOT_FREQUENCY_THRESHOLD)
        .count();
    let cold_numbers = numbers
        .iter()
        .filter(|&&n| metrics.delay(n) > COLD_DELAY_THRESHOLD)
        .count();

    GameAnalysis {
        game: game.clone(),
        evens,
        odds,
        ranges: range_counts(numbers),
        sequence_count,
        avg_score,
        hot_numbers,
        cold_numbers,
    }
}
