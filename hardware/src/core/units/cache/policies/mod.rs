//! Replacement policies.
//!
//! A policy is consulted only when every block of a set is valid and the
//! associativity is greater than one. Direct-mapped caches always evict
//! their single candidate without asking the policy.

use super::set::CacheSet;
use crate::config::ReplacementPolicy as PolicyKind;

pub use self::lru::LruPolicy;
pub use self::random::{RandomPolicy, RandomSource, SeededRandom, SequenceRandom};

mod lru;
mod random;

/// Victim selection within a full set.
pub trait ReplacementPolicy {
    /// Records a use of `way` in `set`, on a hit or after a fill.
    fn update(&mut self, set: &mut CacheSet, way: usize);

    /// Chooses the way to evict from a set whose blocks are all valid.
    fn get_victim(&mut self, set: &CacheSet, rng: &mut dyn RandomSource) -> usize;
}

/// Builds the policy named by a configuration.
pub fn build(kind: PolicyKind) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy),
        PolicyKind::Random => Box::new(RandomPolicy),
    }
}
