//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each block carries an age: the number of accesses to its set since the
//! block was last used. A hit or fill resets the used block's age to zero
//! and ages every other valid block of the set by one. The victim is the
//! block with the largest age, ties going to the lowest way.

use super::{RandomSource, ReplacementPolicy};
use crate::core::units::cache::set::CacheSet;

/// LRU Policy. All state lives in the blocks' `age` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    /// Moves `way` to the most recently used position.
    fn update(&mut self, set: &mut CacheSet, way: usize) {
        for (i, block) in set.blocks_mut().iter_mut().enumerate() {
            if i == way {
                block.age = 0;
            } else if block.valid {
                block.age = block.age.saturating_add(1);
            }
        }
    }

    /// Returns the oldest way.
    fn get_victim(&mut self, set: &CacheSet, _rng: &mut dyn RandomSource) -> usize {
        let mut victim = 0;
        let mut oldest = 0;
        for (i, block) in set.blocks().iter().enumerate() {
            if i == 0 || block.age > oldest {
                victim = i;
                oldest = block.age;
            }
        }
        victim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::cache::policies::SequenceRandom;

    #[test]
    fn victim_is_least_recently_used() {
        let mut set = CacheSet::new(4);
        let mut lru = LruPolicy;
        for way in 0..4 {
            set.install(way, way as u64, false);
            lru.update(&mut set, way);
        }
        lru.update(&mut set, 0);

        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(lru.get_victim(&set, &mut rng), 1);
    }

    #[test]
    fn ties_go_to_lowest_way() {
        let mut set = CacheSet::new(4);
        for way in 0..4 {
            set.install(way, way as u64, false);
        }
        let mut rng = SequenceRandom::new(vec![3]);
        assert_eq!(LruPolicy.get_victim(&set, &mut rng), 0);
    }
}
