use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::analysis::HistoricalMetrics;
use crate::config::SelectionConfig;
use crate::error::{LotoError, Result};
use crate::evaluator::{evaluate_game, GameAnalysis};
use crate::generator::generate_game_with_rng;

pub const DEFAULT_BATCH_COUNT: usize = 10;

/// Deterministic seed from today's date (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// RNG owned by candidate `index` of a batch seeded with `seed`.
pub fn candidate_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ ((index as u64) << 32))
}

/// Generates and evaluates `batch_count` candidates, in generation order.
pub fn generate_candidates(
    metrics: &HistoricalMetrics,
    size: usize,
    batch_count: usize,
    seed: u64,
    parallel: bool,
) -> Result<Vec<GameAnalysis>> {
    if batch_count == 0 {
        return Err(LotoError::InvalidBatchCount(batch_count));
    }

    let candidate = |index: usize| -> Result<GameAnalysis> {
        let mut rng = candidate_rng(seed, index);
        let game = generate_game_with_rng(metrics, size, &mut rng)?;
        Ok(evaluate_game(&game, metrics))
    };

    if parallel {
        (0..batch_count).into_par_iter().map(candidate).collect()
    } else {
        (0..batch_count).map(candidate).collect()
    }
}

/// Highest average score; the earliest candidate wins ties.
pub fn best_candidate(candidates: &[GameAnalysis]) -> Option<&GameAnalysis> {
    candidates.iter().fold(None, |best: Option<&GameAnalysis>, c| match best {
        Some(b) if b.avg_score >= c.avg_score => Some(b),
        _ => Some(c),
    })
}

pub fn pick_best(
    metrics: &HistoricalMetrics,
    size: usize,
    batch_count: usize,
    seed: u64,
) -> Result<GameAnalysis> {
    let candidates = generate_candidates(metrics, size, batch_count, seed, false)?;
    best_of(candidates)
}

pub fn pick_best_with_config(
    metrics: &HistoricalMetrics,
    config: &SelectionConfig,
) -> Result<GameAnalysis> {
    config.validate()?;
    let seed = config.resolved_seed();
    let candidates = generate_candidates(
        metrics,
        config.game_size,
        config.batch_count,
        seed,
        config.parallel,
    )?;
    log::debug!(
        "Generated {} candidates of {} numbers (seed {})",
        candidates.len(),
        config.game_size,
        seed
    );
    best_of(candidates)
}

fn best_of(candidates: Vec<GameAnalysis>) -> Result<GameAnalysis> {
    let len = candidates.len();
    best_candidate(&candidates)
        .cloned()
        .ok_or(LotoError::InvalidBatchCount(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_history;
    use crate::models::{make_test_draws, Game, MAX_GAME_SIZE, MIN_GAME_SIZE};

    fn analysis_with_score(avg_score: f64, first: u8) -> GameAnalysis {
        GameAnalysis {
            game: Game::new((first..first + 15).collect()).unwrap(),
            evens: 0,
            odds: 0,
            ranges: [0; 5],
            sequence_count: 0,
            avg_score,
            hot_numbers: 0,
            cold_numbers: 0,
        }
    }

    #[test]
    fn test_best_is_max_avg_score() {
        let metrics = analyze_history(&make_test_draws(80)).unwrap();
        for size in MIN_GAME_SIZE..=MAX_GAME_SIZE {
            let candidates = generate_candidates(&metrics, size, 10, 2026, false).unwrap();
            let best = pick_best(&metrics, size, 10, 2026).unwrap();
            let max = candidates.iter().map(|c| c.avg_score).fold(f64::MIN, f64::max);
            assert_eq!(best.avg_score, max);
            assert_eq!(best.game.len(), size);
        }
    }

    #[test]
    fn test_batch_of_one_matches_single_generation() {
        let metrics = analyze_history(&make_test_draws(80)).unwrap();
        let best = pick_best(&metrics, 17, 1, 99).unwrap();
        let mut rng = candidate_rng(99, 0);
        let game = generate_game_with_rng(&metrics, 17, &mut rng).unwrap();
        assert_eq!(best, evaluate_game(&game, &metrics));
    }

    #[test]
    fn test_tie_goes_to_first_generated() {
        let candidates = vec![
            analysis_with_score(0.5, 1),
            analysis_with_score(0.7, 2),
            analysis_with_score(0.7, 3),
            analysis_with_score(0.6, 4),
        ];
        let best = best_candidate(&candidates).unwrap();
        assert_eq!(best.game.numbers()[0], 2);
        assert!(best_candidate(&[]).is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let metrics = analyze_history(&make_test_draws(80)).unwrap();
        let sequential = generate_candidates(&metrics, 16, 12, 5, false).unwrap();
        let parallel = generate_candidates(&metrics, 16, 12, 5, true).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_same_seed_same_pick() {
        let metrics = analyze_history(&make_test_draws(80)).unwrap();
        let config = SelectionConfig { game_size: 18, seed: Some(11), ..Default::default() };
        let a = pick_best_with_config(&metrics, &config).unwrap();
        let b = pick_best_with_config(&metrics, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_batch_rejected() {
        let metrics = analyze_history(&make_test_draws(20)).unwrap();
        assert_eq!(pick_best(&metrics, 15, 0, 1), Err(LotoError::InvalidBatchCount(0)));
    }

    #[test]
    fn test_invalid_size_propagates() {
        let metrics = analyze_history(&make_test_draws(20)).unwrap();
        assert_eq!(pick_best(&metrics, 21, 10, 1), Err(LotoError::InvalidSize(21)));
        let config = SelectionConfig { game_size: 14, ..Default::default() };
        assert_eq!(
            pick_best_with_config(&metrics, &config),
            Err(LotoError::InvalidSize(14))
        );
    }

    #[test]
    fn test_date_seed_shape() {
        let seed = date_seed();
        assert!(seed > 2000_01_01 && seed < 3000_01_01);
    }
}
