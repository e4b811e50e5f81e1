//! Random Replacement Policy.
//!
//! Evicts a uniformly chosen way. The random numbers come from a
//! [`RandomSource`] owned by the hierarchy and shared by every cache level,
//! so one seed reproduces a whole run.

use super::ReplacementPolicy;
use crate::core::units::cache::set::CacheSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplier of victim indices.
pub trait RandomSource {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// A seeded pseudo-random generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<usize>,
    pos: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, pos: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value % bound
    }
}

/// Random Policy. Keeps no per-set state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPolicy;

impl ReplacementPolicy for RandomPolicy {
    fn update(&mut self, _set: &mut CacheSet, _way: usize) {}

    fn get_victim(&mut self, set: &CacheSet, rng: &mut dyn RandomSource) -> usize {
        rng.next_index(set.ways())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..64 {
            let x = a.next_index(8);
            assert!(x < 8);
            assert_eq!(x, b.next_index(8));
        }
    }

    #[test]
    fn sequence_cycles_and_wraps() {
        let mut rng = SequenceRandom::new(vec![1, 5]);
        assert_eq!(rng.next_index(4), 1);
        assert_eq!(rng.next_index(4), 1);
        assert_eq!(rng.next_index(4), 1);
    }
}
