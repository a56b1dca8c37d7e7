use crate::error::{LotoError, Result};
use crate::models::POOL_SIZE;

pub const FREQUENCY_WEIGHT: f64 = 0.6;
pub const DELAY_WEIGHT: f64 = 0.4;

/// Per-number score in [0, 1]:
/// `0.6 * frequency / max(frequency) + 0.4 * delay / max(delay)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: [f64; POOL_SIZE],
}

impl ScoreTable {
    pub fn from_counts(frequency: &[u32; POOL_SIZE], delay: &[u32; POOL_SIZE]) -> Result<Self> {
        let max_frequency = frequency.iter().copied().max().unwrap_or(0);
        let max_delay = delay.iter().copied().max().unwrap_or(0);
        if max_frequency == 0 {
            return Err(LotoError::DegenerateHistory(
                "every frequency is zero, scores cannot be normalized".to_string(),
            ));
        }
        if max_delay == 0 {
            return Err(LotoError::DegenerateHistory(
                "every delay is zero, scores cannot be normalized".to_string(),
            ));
        }

        let mut scores = [0.0f64; POOL_SIZE];
        for (i, score) in scores.iter_mut().enumerate() {
            let freq_normalized = frequency[i] as f64 / max_frequency as f64;
            let delay_normalized = delay[i] as f64 / max_delay as f64;
            *score = freq_normalized * FREQUENCY_WEIGHT + delay_normalized * DELAY_WEIGHT;
        }
        Ok(Self { scores })
    }

    /// Score of `number` (1-based). Numbers outside the pool score 0.
    pub fn score(&self, number: u8) -> f64 {
        match (number as usize).checked_sub(1) {
            Some(idx) if idx < POOL_SIZE => self.scores[idx],
            _ => 0.0,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    /// All numbers by descending score; equal scores keep ascending number order.
    pub fn ranked(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=POOL_SIZE as u8).collect();
        numbers.sort_by(|&a, &b| {
            self.score(b)
                .partial_cmp(&self.score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[(usize, u32)], default: u32) -> [u32; POOL_SIZE] {
        let mut out = [default; POOL_SIZE];
        for &(n, v) in values {
            out[n - 1] = v;
        }
        out
    }

    #[test]
    fn test_score_formula() {
        let frequency = counts(&[(1, 10), (2, 5)], 0);
        let delay = counts(&[(1, 0), (2, 4), (3, 2)], 0);
        let table = ScoreTable::from_counts(&frequency, &delay).unwrap();

        assert!((table.score(1) - 0.6).abs() < 1e-12);
        assert!((table.score(2) - (0.3 + 0.4)).abs() < 1e-12);
        assert!((table.score(3) - 0.2).abs() < 1e-12);
        assert_eq!(table.score(4), 0.0);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let frequency: [u32; POOL_SIZE] = std::array::from_fn(|i| (i as u32 * 7) % 13);
        let delay: [u32; POOL_SIZE] = std::array::from_fn(|i| (i as u32 * 3) % 11);
        let table = ScoreTable::from_counts(&frequency, &delay).unwrap();
        for &s in table.as_slice() {
            assert!((0.0..=1.0).contains(&s), "score {s} out of range");
        }
    }

    #[test]
    fn test_score_monotonic() {
        let base_freq = counts(&[(1, 4), (2, 8)], 1);
        let base_delay = counts(&[(1, 3), (2, 3)], 1);
        let table = ScoreTable::from_counts(&base_freq, &base_delay).unwrap();
        assert!(table.score(2) >= table.score(1));

        let delay = counts(&[(1, 3), (2, 6)], 1);
        let table = ScoreTable::from_counts(&base_freq, &delay).unwrap();
        assert!(table.score(2) > table.score(1));
    }

    #[test]
    fn test_degenerate_frequency() {
        let zero = [0u32; POOL_SIZE];
        let delay = [1u32; POOL_SIZE];
        assert!(matches!(
            ScoreTable::from_counts(&zero, &delay),
            Err(LotoError::DegenerateHistory(_))
        ));
    }

    #[test]
    fn test_degenerate_delay() {
        let frequency = [1u32; POOL_SIZE];
        let zero = [0u32; POOL_SIZE];
        assert!(matches!(
            ScoreTable::from_counts(&frequency, &zero),
            Err(LotoError::DegenerateHistory(_))
        ));
    }

    #[test]
    fn test_ranked_tiebreak_ascending() {
        let frequency = counts(&[(20, 9), (3, 9)], 1);
        let delay = [1u32; POOL_SIZE];
        let ranked = ScoreTable::from_counts(&frequency, &delay).unwrap().ranked();
        assert_eq!(ranked.len(), POOL_SIZE);
        assert_eq!(&ranked[..3], &[3, 20, 1]);
        assert_eq!(ranked[POOL_SIZE - 1], 25);
    }
}
