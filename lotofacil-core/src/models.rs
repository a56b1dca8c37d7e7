use serde::Serialize;

use crate::error::{LotoError, Result};

pub const POOL_SIZE: usize = 25;
pub const DRAW_SIZE: usize = 15;
pub const MIN_GAME_SIZE: usize = 15;
pub const MAX_GAME_SIZE: usize = 20;

/// Width of a range bucket; the pool splits into five buckets 1-5, 6-10, ..., 21-25.
pub const RANGE_WIDTH: u8 = 5;
pub const RANGE_COUNT: usize = POOL_SIZE / RANGE_WIDTH as usize;

/// One historical result: 15 distinct numbers in 1..=25, stored ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    numbers: [u8; DRAW_SIZE],
}

impl Draw {
    pub fn new(numbers: &[u8]) -> Result<Self> {
        validate_draw(numbers)?;
        let mut sorted = [0u8; DRAW_SIZE];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();
        Ok(Self { numbers: sorted })
    }

    /// Builds a draw from textual numbers such as `"01"` or `" 7 "`.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let numbers = raw
            .iter()
            .map(|s| {
                let s = s.as_ref().trim();
                let n = s
                    .parse::<i64>()
                    .map_err(|_| LotoError::MalformedDraw(format!("'{s}' is not a number")))?;
                u8::try_from(n).ok().filter(|&n| is_in_pool(n)).ok_or_else(|| {
                    LotoError::MalformedDraw(format!("number {n} out of range (1-{POOL_SIZE})"))
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::new(&numbers)
    }

    pub fn numbers(&self) -> &[u8; DRAW_SIZE] {
        &self.numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn parity(&self) -> ParitySplit {
        ParitySplit::of(&self.numbers)
    }
}

pub fn validate_draw(numbers: &[u8]) -> Result<()> {
    if numbers.len() != DRAW_SIZE {
        return Err(LotoError::MalformedDraw(format!(
            "expected {DRAW_SIZE} numbers, got {}",
            numbers.len()
        )));
    }
    let mut seen = [false; POOL_SIZE];
    for &n in numbers {
        if !is_in_pool(n) {
            return Err(LotoError::MalformedDraw(format!(
                "number {n} out of range (1-{POOL_SIZE})"
            )));
        }
        let idx = (n - 1) as usize;
        if seen[idx] {
            return Err(LotoError::MalformedDraw(format!("duplicate number {n}")));
        }
        seen[idx] = true;
    }
    Ok(())
}

pub fn is_in_pool(number: u8) -> bool {
    number >= 1 && number as usize <= POOL_SIZE
}

/// Whether the draws of a history file are listed oldest or newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParitySplit {
    pub evens: usize,
    pub odds: usize,
}

impl ParitySplit {
    pub fn of(numbers: &[u8]) -> Self {
        let evens = numbers.iter().filter(|&&n| n % 2 == 0).count();
        Self {
            evens,
            odds: numbers.len() - evens,
        }
    }
}

/// Index (0..5) of the five-wide bucket holding `number`.
pub fn range_index(number: u8) -> usize {
    ((number.max(1) - 1) / RANGE_WIDTH) as usize
}

pub fn range_label(index: usize) -> String {
    let low = index as u8 * RANGE_WIDTH + 1;
    format!("{}-{}", low, low + RANGE_WIDTH - 1)
}

pub fn range_counts(numbers: &[u8]) -> [usize; RANGE_COUNT] {
    let mut counts = [0usize; RANGE_COUNT];
    for &n in numbers {
        counts[range_index(n)] += 1;
    }
    counts
}

/// A candidate ticket: between 15 and 20 distinct numbers, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Game {
    numbers: Vec<u8>,
}

impl Game {
    pub fn new(mut numbers: Vec<u8>) -> Result<Self> {
        check_game_size(numbers.len())?;
        numbers.sort_unstable();
        if let Some(&n) = numbers.iter().find(|&&n| !is_in_pool(n)) {
            return Err(LotoError::MalformedGame(format!(
                "number {n} out of range (1-{POOL_SIZE})"
            )));
        }
        if let Some(pair) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(LotoError::MalformedGame(format!("duplicate number {}", pair[0])));
        }
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .numbers
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{joined}")
    }
}

pub fn check_game_size(size: usize) -> Result<()> {
    if !(MIN_GAME_SIZE..=MAX_GAME_SIZE).contains(&size) {
        return Err(LotoError::InvalidSize(size));
    }
    Ok(())
}

/// Deterministic pseudo-random history, oldest first.
#[cfg(test)]
pub(crate) fn make_test_draws(n: usize) -> Vec<Draw> {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    let mut rng = StdRng::seed_from_u64(2003);
    (0..n)
        .map(|_| {
            let mut pool: Vec<u8> = (1..=POOL_SIZE as u8).collect();
            pool.shuffle(&mut rng);
            Draw::new(&pool[..DRAW_SIZE]).unwrap()
        })
        .collect()
}
