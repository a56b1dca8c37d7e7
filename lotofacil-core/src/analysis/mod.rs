pub mod scorer;

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{LotoError, Result};
use crate::models::{Draw, DrawOrder, ParitySplit, POOL_SIZE};

use scorer::ScoreTable;

pub const TOP_SEQUENCE_COUNT: usize = 10;

/// Three consecutive numbers seen together in a draw, with how often that happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceStat {
    pub sequence: [u8; 3],
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvenOddStat {
    pub evens: usize,
    pub odds: usize,
    pub frequency: u32,
}

impl EvenOddStat {
    pub fn split(&self) -> ParitySplit {
        ParitySplit {
            evens: self.evens,
            odds: self.odds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub delay: u32,
    pub score: f64,
}

/// Aggregate statistics over a draw history. Built once by [`analyze_history`],
/// read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalMetrics {
    draw_count: usize,
    frequency: [u32; POOL_SIZE],
    delay: [u32; POOL_SIZE],
    sequences: Vec<SequenceStat>,
    even_odd_combinations: Vec<EvenOddStat>,
    #[serde(skip)]
    scores: ScoreTable,
}

impl HistoricalMetrics {
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn frequencies(&self) -> &[u32; POOL_SIZE] {
        &self.frequency
    }

    pub fn delays(&self) -> &[u32; POOL_SIZE] {
        &self.delay
    }

    pub fn frequency(&self, number: u8) -> u32 {
        lookup(&self.frequency, number)
    }

    pub fn delay(&self, number: u8) -> u32 {
        lookup(&self.delay, number)
    }

    /// Top consecutive triples, most frequent first.
    pub fn sequences(&self) -> &[SequenceStat] {
        &self.sequences
    }

    /// Observed parity splits, most frequent first.
    pub fn even_odd_combinations(&self) -> &[EvenOddStat] {
        &self.even_odd_combinations
    }

    /// The most frequent parity split of the history.
    pub fn ideal_parity(&self) -> Option<ParitySplit> {
        self.even_odd_combinations.first().map(EvenOddStat::split)
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn score(&self, number: u8) -> f64 {
        self.scores.score(number)
    }

    pub fn number_stats(&self) -> Vec<NumberStats> {
        (1..=POOL_SIZE as u8)
            .map(|number| NumberStats {
                number,
                frequency: self.frequency(number),
                delay: self.delay(number),
                score: self.score(number),
            })
            .collect()
    }
}

fn lookup(values: &[u32; POOL_SIZE], number: u8) -> u32 {
    match (number as usize).checked_sub(1) {
        Some(idx) if idx < POOL_SIZE => values[idx],
        _ => 0,
    }
}

/// Running tallies while folding over the history.
struct Accumulator {
    frequency: [u32; POOL_SIZE],
    last_seen: [Option<usize>; POOL_SIZE],
    // Vec + index map keeps first-encountered order for stable tie-breaking.
    sequences: Vec<SequenceStat>,
    sequence_index: HashMap<[u8; 3], usize>,
    even_odd: Vec<EvenOddStat>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            frequency: [0; POOL_SIZE],
            last_seen: [None; POOL_SIZE],
            sequences: Vec::new(),
            sequence_index: HashMap::new(),
            even_odd: Vec::new(),
        }
    }

    fn record(mut self, index: usize, draw: &Draw) -> Self {
        let numbers = draw.numbers();
        for &n in numbers {
            let idx = (n - 1) as usize;
            self.frequency[idx] += 1;
            self.last_seen[idx] = Some(index);
        }

        let split = draw.parity();
        match self
            .even_odd
            .iter_mut()
            .find(|e| e.evens == split.evens && e.odds == split.odds)
        {
            Some(entry) => entry.frequency += 1,
            None => self.even_odd.push(EvenOddStat {
                evens: split.evens,
                odds: split.odds,
                frequency: 1,
            }),
        }

        // Draw numbers are distinct and ascending, so consecutive values are adjacent.
        for w in numbers.windows(3) {
            if w[1] - w[0] == 1 && w[2] - w[1] == 1 {
                let key = [w[0], w[1], w[2]];
                match self.sequence_index.get(&key) {
                    Some(&pos) => self.sequences[pos].frequency += 1,
                    None => {
                        self.sequence_index.insert(key, self.sequences.len());
                        self.sequences.push(SequenceStat {
                            sequence: key,
                            frequency: 1,
                        });
                    }
                }
            }
        }

        self
    }

    fn finish(self, draw_count: usize) -> Result<HistoricalMetrics> {
        let total = draw_count as u32;
        let delay: [u32; POOL_SIZE] = std::array::from_fn(|i| match self.last_seen[i] {
            Some(last) => total - last as u32 - 1,
            None => total,
        });

        let mut sequences = self.sequences;
        sequences.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        sequences.truncate(TOP_SEQUENCE_COUNT);

        let mut even_odd_combinations = self.even_odd;
        even_odd_combinations.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        let scores = ScoreTable::from_counts(&self.frequency, &delay)?;

        Ok(HistoricalMetrics {
            draw_count,
            frequency: self.frequency,
            delay,
            sequences,
            even_odd_combinations,
            scores,
        })
    }
}

/// Analyzes a chronological history (`draws[0]` is the oldest draw).
pub fn analyze_history(draws: &[Draw]) -> Result<HistoricalMetrics> {
    analyze_history_ordered(draws, DrawOrder::OldestFirst)
}

pub fn analyze_history_ordered(draws: &[Draw], order: DrawOrder) -> Result<HistoricalMetrics> {
    if draws.is_empty() {
        return Err(LotoError::DegenerateHistory(
            "no draws to analyze".to_string(),
        ));
    }

    let chronological: Vec<&Draw> = match order {
        DrawOrder::OldestFirst => draws.iter().collect(),
        DrawOrder::NewestFirst => draws.iter().rev().collect(),
    };

    let metrics = chronological
        .into_iter()
        .enumerate()
        .fold(Accumulator::new(), |acc, (i, draw)| acc.record(i, draw))
        .finish(draws.len())?;

    log::debug!(
        "Analyzed {} draws: {} top sequences, {} parity splits",
        metrics.draw_count,
        metrics.sequences.len(),
        metrics.even_odd_combinations.len()
    );

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{make_test_draws, DRAW_SIZE};

    fn draw_of(range: std::ops::RangeInclusive<u8>) -> Draw {
        Draw::new(&range.collect::<Vec<u8>>()).unwrap()
    }

    fn three_draws() -> Vec<Draw> {
        vec![draw_of(1..=15), draw_of(2..=16), draw_of(11..=25)]
    }

    #[test]
    fn test_frequency_fixed_dataset() {
        let metrics = analyze_history(&three_draws()).unwrap();
        for n in 11..=15 {
            assert_eq!(metrics.frequency(n), 3, "frequency[{n}]");
        }
        assert_eq!(metrics.frequency(1), 1);
        assert_eq!(metrics.frequency(16), 2);
        assert_eq!(metrics.frequency(25), 1);
    }

    #[test]
    fn test_frequency_sum() {
        for n in [1, 7, 40, 120] {
            let draws = make_test_draws(n);
            let metrics = analyze_history(&draws).unwrap();
            let sum: u32 = metrics.frequencies().iter().sum();
            assert_eq!(sum as usize, DRAW_SIZE * n);
        }
    }

    #[test]
    fn test_delay_bounds() {
        let draws = make_test_draws(60);
        let metrics = analyze_history(&draws).unwrap();
        for &d in metrics.delays() {
            assert!(d as usize <= draws.len());
        }
    }

    #[test]
    fn test_delay_fixed_dataset() {
        let metrics = analyze_history(&three_draws()).unwrap();
        // 1 only in the oldest draw, 16 last seen in the middle one, 25 in the latest.
        assert_eq!(metrics.delay(1), 2);
        assert_eq!(metrics.delay(16), 1);
        assert_eq!(metrics.delay(25), 0);
        assert_eq!(metrics.delay(11), 0);
    }

    #[test]
    fn test_delay_never_seen() {
        let draws = vec![draw_of(1..=15), draw_of(1..=15)];
        let metrics = analyze_history(&draws).unwrap();
        assert_eq!(metrics.delay(20), 2);
        assert_eq!(metrics.delay(3), 0);
    }

    #[test]
    fn test_newest_first_order() {
        let mut draws = three_draws();
        let oldest_first = analyze_history(&draws).unwrap();
        draws.reverse();
        let newest_first = analyze_history_ordered(&draws, DrawOrder::NewestFirst).unwrap();
        assert_eq!(oldest_first.delays(), newest_first.delays());
        assert_eq!(oldest_first.frequencies(), newest_first.frequencies());

        let misread = analyze_history(&draws).unwrap();
        assert_eq!(misread.delay(1), 0);
    }

    #[test]
    fn test_sequences_counted_and_ordered() {
        let metrics = analyze_history(&three_draws()).unwrap();
        let sequences = metrics.sequences();
        assert_eq!(sequences.len(), TOP_SEQUENCE_COUNT);
        // 11-12-13, 12-13-14 and 13-14-15 appear in all three draws.
        assert_eq!(sequences[0], SequenceStat { sequence: [11, 12, 13], frequency: 3 });
        assert_eq!(sequences[1].sequence, [12, 13, 14]);
        assert_eq!(sequences[2].sequence, [13, 14, 15]);
        for w in sequences.windows(2) {
            assert!(w[0].frequency >= w[1].frequency);
        }
    }

    #[test]
    fn test_sequence_ties_keep_discovery_order() {
        let metrics = analyze_history(&[draw_of(1..=15)]).unwrap();
        let firsts: Vec<u8> = metrics.sequences().iter().map(|s| s.sequence[0]).collect();
        assert_eq!(firsts, (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_runs_only_where_consecutive() {
        let mut numbers: Vec<u8> = (1..=25).step_by(2).collect();
        numbers.extend([2, 24]);
        let metrics = analyze_history(&[Draw::new(&numbers).unwrap()]).unwrap();
        let found: Vec<[u8; 3]> = metrics.sequences().iter().map(|s| s.sequence).collect();
        assert_eq!(found, vec![[1, 2, 3], [23, 24, 25]]);
    }

    #[test]
    fn test_even_odd_combinations() {
        let metrics = analyze_history(&three_draws()).unwrap();
        // 1..=15 → 7/8, 2..=16 → 8/7, 11..=25 → 7/8
        let combos = metrics.even_odd_combinations();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0], EvenOddStat { evens: 7, odds: 8, frequency: 2 });
        assert_eq!(combos[1], EvenOddStat { evens: 8, odds: 7, frequency: 1 });
        assert_eq!(metrics.ideal_parity(), Some(ParitySplit { evens: 7, odds: 8 }));
        let total: u32 = combos.iter().map(|c| c.frequency).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_empty_history_is_degenerate() {
        let result = analyze_history(&[]);
        assert!(matches!(result, Err(LotoError::DegenerateHistory(_))));
    }

    #[test]
    fn test_number_stats_rows() {
        let metrics = analyze_history(&three_draws()).unwrap();
        let rows = metrics.number_stats();
        assert_eq!(rows.len(), POOL_SIZE);
        assert_eq!(rows[10].number, 11);
        assert_eq!(rows[10].frequency, 3);
        assert!((rows[10].score - metrics.score(11)).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = analyze_history(&three_draws()).unwrap();
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["draw_count"], 3);
        assert_eq!(json["frequency"].as_array().unwrap().len(), POOL_SIZE);
        assert!(json.get("scores").is_none());
    }
}
