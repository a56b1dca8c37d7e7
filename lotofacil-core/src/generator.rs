use rand::Rng;

use crate::analysis::HistoricalMetrics;
use crate::error::{LotoError, Result};
use crate::models::{
    check_game_size, range_index, Game, ParitySplit, DRAW_SIZE, POOL_SIZE, RANGE_COUNT,
};

/// How many of the most frequent triples are eligible to seed a game.
pub const SEED_POOL_SIZE: usize = 3;

/// Upper bounds the greedy pass must respect, scaled from a 15-number draw to `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Caps {
    evens: usize,
    odds: usize,
    per_range: usize,
}

impl Caps {
    fn new(ideal: ParitySplit, size: usize) -> Self {
        Self {
            evens: (ideal.evens * size).div_ceil(DRAW_SIZE),
            odds: (ideal.odds * size).div_ceil(DRAW_SIZE),
            per_range: size.div_ceil(RANGE_COUNT),
        }
    }
}

/// Numbers picked so far with their parity and range tallies.
#[derive(Debug, Clone)]
struct Selection {
    numbers: Vec<u8>,
    taken: [bool; POOL_SIZE],
    evens: usize,
    odds: usize,
    ranges: [usize; RANGE_COUNT],
}

impl Selection {
    fn with_capacity(size: usize) -> Self {
        Self {
            numbers: Vec::with_capacity(size),
            taken: [false; POOL_SIZE],
            evens: 0,
            odds: 0,
            ranges: [0; RANGE_COUNT],
        }
    }

    fn contains(&self, number: u8) -> bool {
        self.taken[(number - 1) as usize]
    }

    fn push(&mut self, number: u8) {
        if self.contains(number) {
            return;
        }
        self.taken[(number - 1) as usize] = true;
        self.numbers.push(number);
        if number % 2 == 0 {
            self.evens += 1;
        } else {
            self.odds += 1;
        }
        self.ranges[range_index(number)] += 1;
    }

    fn admits(&self, number: u8, caps: &Caps) -> bool {
        let parity_ok = if number % 2 == 0 {
            self.evens < caps.evens
        } else {
            self.odds < caps.odds
        };
        parity_ok && self.ranges[range_index(number)] < caps.per_range
    }

    fn len(&self) -> usize {
        self.numbers.len()
    }
}

/// Generates a game of `size` numbers.
///
/// `choose(len)` picks which of the top `len` triples seeds the game; it is the only
/// source of randomness, so a fixed chooser makes generation reproducible. Results
/// past `len - 1` are clamped.
pub fn generate_game<F>(metrics: &HistoricalMetrics, size: usize, mut choose: F) -> Result<Game>
where
    F: FnMut(usize) -> usize,
{
    check_game_size(size)?;
    let ideal = metrics.ideal_parity().ok_or_else(|| {
        LotoError::DegenerateHistory("no parity split observed".to_string())
    })?;

    let ranked = metrics.scores().ranked();
    let caps = Caps::new(ideal, size);

    let mut selection = Selection::with_capacity(size);
    seed_with_sequence(metrics, &mut selection, &mut choose);
    greedy_fill(&ranked, &caps, size, &mut selection);

    if selection.len() < size {
        log::debug!(
            "Caps {:?} left {} of {} slots empty, relaxing",
            caps,
            size - selection.len(),
            size
        );
        relax_fill(&ranked, size, &mut selection);
    }

    Game::new(selection.numbers)
}

pub fn generate_game_with_rng<R: Rng>(
    metrics: &HistoricalMetrics,
    size: usize,
    rng: &mut R,
) -> Result<Game> {
    generate_game(metrics, size, |len| rng.random_range(0..len))
}

fn seed_with_sequence<F>(metrics: &HistoricalMetrics, selection: &mut Selection, choose: &mut F)
where
    F: FnMut(usize) -> usize,
{
    let top = &metrics.sequences()[..metrics.sequences().len().min(SEED_POOL_SIZE)];
    if top.is_empty() {
        log::warn!("No consecutive triple in history, generating without a seed sequence");
        return;
    }
    let pick = choose(top.len()).min(top.len() - 1);
    let seed = top[pick].sequence;
    log::debug!("Seeding game with sequence {:?}", seed);
    for n in seed {
        selection.push(n);
    }
}

fn greedy_fill(ranked: &[u8], caps: &Caps, size: usize, selection: &mut Selection) {
    for &n in ranked {
        if selection.len() >= size {
            break;
        }
        if selection.contains(n) || !selection.admits(n, caps) {
            continue;
        }
        selection.push(n);
    }
}

fn relax_fill(ranked: &[u8], size: usize, selection: &mut Selection) {
    for &n in ranked {
        if selection.len() >= size {
            break;
        }
        selection.push(n);
    }
}
