//! Block and set storage.
//!
//! Storage is allocated once when a cache level is built and reused for the
//! lifetime of the simulation: blocks are overwritten in place on fill and
//! eviction, never removed.

/// One cache block's metadata. Data contents are not modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub valid: bool,
    /// Modified since fill; only set by data caches under write-back.
    pub dirty: bool,
    pub tag: u64,
    /// Accesses to the owning set since this block was last used (LRU only).
    pub age: u64,
}

/// An ordered group of `associativity` blocks.
///
/// At most one valid block of a set holds a given tag.
#[derive(Clone, Debug)]
pub struct CacheSet {
    blocks: Vec<Block>,
}

impl CacheSet {
    /// Creates a set of `ways` invalid blocks.
    pub fn new(ways: usize) -> Self {
        Self {
            blocks: vec![Block::default(); ways],
        }
    }

    /// Returns the way holding a valid block tagged `tag`.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.valid && b.tag == tag)
    }

    /// Returns the lowest-numbered invalid way.
    pub fn first_invalid(&self) -> Option<usize> {
        self.blocks.iter().position(|b| !b.valid)
    }

    pub fn valid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }

    pub fn ways(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn block(&self, way: usize) -> &Block {
        &self.blocks[way]
    }

    pub fn block_mut(&mut self, way: usize) -> &mut Block {
        &mut self.blocks[way]
    }

    /// Overwrites `way` with a fresh block for `tag`, returning the previous contents.
    pub fn install(&mut self, way: usize, tag: u64, dirty: bool) -> Block {
        std::mem::replace(
            &mut self.blocks[way],
            Block {
                valid: true,
                dirty,
                tag,
                age: 0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_returns_evicted_block() {
        let mut set = CacheSet::new(2);
        assert_eq!(set.first_invalid(), Some(0));
        let old = set.install(0, 7, true);
        assert!(!old.valid);
        assert_eq!(set.find(7), Some(0));
        assert_eq!(set.first_invalid(), Some(1));

        let old = set.install(0, 9, false);
        assert!(old.valid && old.dirty);
        assert_eq!(old.tag, 7);
        assert_eq!(set.find(7), None);
        assert_eq!(set.valid_count(), 1);
    }
}
