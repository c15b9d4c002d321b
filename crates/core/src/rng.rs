//! RNG module - seeded letter generation
//!
//! Letters are drawn either uniformly from A-Z or weighted by an English-like
//! frequency table (E and A common, J/Q/X/Z rare). Batches are produced whole
//! so the letter queue is refilled all-or-nothing.
//!
//! Also provides a simple LCG so games are reproducible from a seed.

use serde::{Deserialize, Serialize};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max
    }

    /// Current state (for restarting a game with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Relative letter frequencies, A through Z
const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 3),
    ('E', 15),
    ('F', 2),
    ('G', 2),
    ('H', 2),
    ('I', 8),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 6),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 6),
    ('V', 2),
    ('W', 1),
    ('X', 1),
    ('Y', 1),
    ('Z', 1),
];

/// How letters are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterDistribution {
    /// Every letter A-Z equally likely
    Uniform,
    /// English-like frequency weighting
    #[default]
    Weighted,
}

impl LetterDistribution {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Some(LetterDistribution::Uniform),
            "weighted" => Some(LetterDistribution::Weighted),
            _ => None,
        }
    }
}

/// Seeded generator of letter batches
#[derive(Debug, Clone)]
pub struct LetterGenerator {
    rng: SimpleRng,
    distribution: LetterDistribution,
    total_weight: u32,
}

impl LetterGenerator {
    pub fn new(seed: u32, distribution: LetterDistribution) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            distribution,
            total_weight: LETTER_WEIGHTS.iter().map(|&(_, w)| w).sum(),
        }
    }

    pub fn distribution(&self) -> LetterDistribution {
        self.distribution
    }

    /// Draw a single letter
    pub fn next_letter(&mut self) -> char {
        match self.distribution {
            LetterDistribution::Uniform => {
                let idx = self.rng.next_range(26) as u8;
                char::from(b'A' + idx)
            }
            LetterDistribution::Weighted => {
                let mut roll = self.rng.next_range(self.total_weight);
                for &(letter, weight) in &LETTER_WEIGHTS {
                    if roll < weight {
                        return letter;
                    }
                    roll -= weight;
                }
                // Unreachable while `roll < total_weight`.
                'E'
            }
        }
    }

    /// Draw a complete batch of `count` letters
    pub fn batch(&mut self, count: usize) -> Vec<char> {
        (0..count).map(|_| self.next_letter()).collect()
    }

    /// Pick a value in `[0, max)`; used for random spawn columns
    pub fn pick(&mut self, max: usize) -> usize {
        self.rng.next_range(max as u32) as usize
    }

    /// Current RNG state
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for LetterGenerator {
    fn default() -> Self {
        Self::new(1, LetterDistribution::default())
    }
}
