//! Upon insertion every node is assigned a level, and it takes part in every level from 0 up to
//! and including that one.  Level 0 holds all the nodes and each level `n > 0` holds a random
//! subset of the nodes on level `n - 1`.
//!
//! A geometric distribution is used, whereby the chance that a node reaches level `n` is `p`
//! times the chance of it reaching level `n - 1`.  With `p = 1/2` only a handful of nodes reach
//! the top levels and a search skips about half of the remaining nodes each time it descends.
//!
//! The randomness itself is a `RandomSource` handed to the generator.  The default one is a
//! `StdRng` seeded from the operating system; a predictable source lets an adversary pick keys
//! that all land on level 0 and turn every lookup into a linear scan.

use std::fmt;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::error::SkipListError;

/// Default probability of a node being promoted to the next level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Most levels a list may have.  With p = 1/2 a node reaches level 64 about once in 2^64
/// insertions, so more levels only cost memory in the head node.
pub const MAX_LEVEL: usize = 64;

/// A source of uniformly distributed floats.  `Sync` lets a list holding one sit behind an
/// `RwLock` shared by several readers.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `[0, 1)`.
    fn uniform(&mut self) -> f64;
}

impl RandomSource for StdRng {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Upon the insertion of a new node in the list, the node is replicated to higher levels with a
/// certain probability as determined by a `LevelGenerator`.
///
/// The `total()` reflects the total number of levels, and `random()` must produce an integer in
/// the range `[0, total)`.
pub trait LevelGenerator {
    fn random(&mut self) -> usize;
    fn total(&self) -> usize;
}

/// A level generator which will produce geometrically distributed numbers.
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: Box<dyn RandomSource>,
}

impl GeometricalLevelGenerator {
    /// Create a new generator with `total` levels and a promotion probability of 1/2, seeded
    /// from the operating system.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist::{GeometricalLevelGenerator, LevelGenerator};
    ///
    /// let mut lg = GeometricalLevelGenerator::new(8).unwrap();
    /// assert!(lg.random() < 8);
    /// ```
    pub fn new(total: usize) -> Result<Self, SkipListError> {
        Self::with_probability(total, DEFAULT_PROBABILITY)
    }

    /// Create a new generator with `total` levels and `p` as the probability that a node is
    /// present in the next level, seeded from the operating system.
    ///
    /// Fails if the operating system cannot provide entropy; no weaker source is substituted.
    pub fn with_probability(total: usize, p: f64) -> Result<Self, SkipListError> {
        let rng = StdRng::from_rng(OsRng)?;
        Self::with_source(total, p, Box::new(rng))
    }

    /// Create a new generator drawing from `rng`.
    ///
    /// `total` must be in `1..=MAX_LEVEL` and `p` in `(0, 1)`.
    pub fn with_source(
        total: usize,
        p: f64,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, SkipListError> {
        if total == 0 || total > MAX_LEVEL {
            return Err(SkipListError::InvalidMaxLevel(total));
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(SkipListError::InvalidProbability(p));
        }
        Ok(GeometricalLevelGenerator { total, p, rng })
    }

    /// Create a generator with a fixed seed.  The sequence of levels is reproducible, which is
    /// what tests and benchmarks want and what nothing else should use.
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, SkipListError> {
        Self::with_source(total, p, Box::new(StdRng::seed_from_u64(seed)))
    }

    /// The promotion probability.
    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 0;
        while h + 1 < self.total && self.rng.uniform() < self.p {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Debug for GeometricalLevelGenerator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GeometricalLevelGenerator")
            .field("total", &self.total)
            .field("p", &self.p)
            .finish()
    }
}
