//! Set-associative cache level.
//!
//! A [`CacheLevel`] classifies each access as a hit, a compulsory miss
//! (an invalid block was free in the set) or a conflict/capacity miss (the
//! set was full and a victim had to be evicted), applies the write and
//! allocate policies of data caches, and tells the caller which accesses
//! must continue to the next level.

/// Address field extraction.
pub mod decoder;

/// Replacement policies and random sources.
pub mod policies;

/// Block and set storage.
pub mod set;

use self::decoder::{AddressDecoder, DecodedAddress};
use self::policies::{RandomSource, ReplacementPolicy};
use self::set::CacheSet;
use crate::common::{AccessType, ConfigError};
use crate::config::{AllocatePolicy, CacheConfig, DataCacheConfig, WritePolicy};
use crate::stats::CacheStats;
use tracing::{debug, trace};

/// Classification of a single access at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    /// Miss that found an invalid block in its set.
    CompulsoryMiss,
    /// Miss in a full set, or a write miss that allocates nothing. Reported
    /// as a conflict miss for direct-mapped caches and as a capacity miss
    /// otherwise.
    ConflictOrCapacityMiss,
    /// The level is disabled and the access passed straight through.
    Bypass,
}

impl Outcome {
    pub fn is_hit(self) -> bool {
        matches!(self, Outcome::Hit)
    }

    pub fn is_miss(self) -> bool {
        matches!(
            self,
            Outcome::CompulsoryMiss | Outcome::ConflictOrCapacityMiss
        )
    }
}

/// Result of [`CacheLevel::access`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    pub outcome: Outcome,
    /// Access to issue at the next level for the same address, if any.
    pub propagate: Option<AccessType>,
    /// Block address of a dirty block evicted by this access. The caller
    /// issues it to the next level as a write.
    ///
    /// This level counts the whole block as stored words, while the next
    /// level sees a single write access per evicted block.
    pub writeback: Option<u64>,
}

impl AccessOutcome {
    fn bypass(kind: AccessType) -> Self {
        Self {
            outcome: Outcome::Bypass,
            propagate: Some(kind),
            writeback: None,
        }
    }
}

/// Write handling of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKind {
    /// Instruction cache: read-only, never dirty.
    Instruction,
    Data {
        write_policy: WritePolicy,
        allocate_policy: AllocatePolicy,
    },
}

/// One simulated cache level.
pub struct CacheLevel {
    /// `false` when configured with zero blocks.
    pub enabled: bool,
    name: String,
    kind: CacheKind,
    config: CacheConfig,
    decoder: Option<AddressDecoder>,
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
    stats: CacheStats,
}

impl CacheLevel {
    /// Builds an instruction cache.
    pub fn instruction(name: &str, config: &CacheConfig) -> Result<Self, ConfigError> {
        Self::new(name, config, CacheKind::Instruction)
    }

    /// Builds a data cache.
    pub fn data(name: &str, config: &DataCacheConfig) -> Result<Self, ConfigError> {
        Self::new(
            name,
            &config.geometry,
            CacheKind::Data {
                write_policy: config.write_policy,
                allocate_policy: config.allocate_policy,
            },
        )
    }

    /// Validates the geometry and allocates every set.
    ///
    /// A configuration with zero blocks yields a disabled level.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the associativity is zero, larger than
    /// the block count, not a power of two or does not divide the block
    /// count, or if the decoder rejects the derived geometry.
    pub fn new(name: &str, config: &CacheConfig, kind: CacheKind) -> Result<Self, ConfigError> {
        let policy = policies::build(config.policy);
        if !config.enabled() {
            return Ok(Self {
                enabled: false,
                name: name.to_string(),
                kind,
                config: config.clone(),
                decoder: None,
                sets: Vec::new(),
                policy,
                stats: CacheStats::default(),
            });
        }

        let ways = config.associativity;
        if ways == 0 || ways > config.num_blocks {
            return Err(ConfigError::InvalidAssociativity {
                cache: name.to_string(),
                associativity: ways,
                num_blocks: config.num_blocks,
            });
        }
        if !ways.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                cache: name.to_string(),
                what: "associativity",
                value: ways,
            });
        }
        if config.num_blocks % ways != 0 {
            return Err(ConfigError::NotDivisible {
                cache: name.to_string(),
                num_blocks: config.num_blocks,
                associativity: ways,
            });
        }

        let num_sets = config.num_sets();
        let decoder = AddressDecoder::new(name, config.words_per_block, num_sets)?;

        Ok(Self {
            enabled: true,
            name: name.to_string(),
            kind,
            config: config.clone(),
            decoder: Some(decoder),
            sets: vec![CacheSet::new(ways); num_sets],
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Simulates one access.
    ///
    /// Instruction fetches and reads never dirty a block. Writes to a data
    /// cache follow its policies:
    ///
    /// * **Allocate** installs the missed block; **NoAllocate** leaves the
    ///   set untouched, forwards the write and counts the miss as a
    ///   conflict/capacity miss.
    /// * **WriteThrough** forwards every write that hits or allocates;
    ///   **WriteBack** marks the block dirty and forwards it only when it
    ///   is evicted, through [`AccessOutcome::writeback`].
    ///
    /// Every miss propagates exactly one access of the same kind.
    pub fn access(
        &mut self,
        kind: AccessType,
        addr: u64,
        rng: &mut dyn RandomSource,
    ) -> AccessOutcome {
        let Some(decoder) = self.decoder else {
            return AccessOutcome::bypass(kind);
        };
        let (write_policy, allocate_policy) = match self.kind {
            CacheKind::Data {
                write_policy,
                allocate_policy,
            } => (Some(write_policy), Some(allocate_policy)),
            CacheKind::Instruction => (None, None),
        };
        let is_write = kind.is_write() && write_policy.is_some();
        let ways = self.config.associativity;
        let words = self.config.words_per_block as u64;

        if is_write {
            self.stats.writes += 1;
        } else {
            self.stats.reads += 1;
        }

        let DecodedAddress { set, tag } = decoder.decode(addr);
        let cache_set = &mut self.sets[set];

        if let Some(way) = cache_set.find(tag) {
            if ways > 1 {
                self.policy.update(cache_set, way);
            }
            let propagate = match write_policy {
                Some(WritePolicy::WriteThrough) if is_write => {
                    self.stats.words_stored += 1;
                    Some(AccessType::Write)
                }
                Some(WritePolicy::WriteBack) if is_write => {
                    cache_set.block_mut(way).dirty = true;
                    None
                }
                _ => None,
            };
            trace!(cache = %self.name, addr, set, way, "hit");
            return AccessOutcome {
                outcome: Outcome::Hit,
                propagate,
                writeback: None,
            };
        }

        if is_write && allocate_policy == Some(AllocatePolicy::NoAllocate) {
            // Nothing is filled, so the miss can never be compulsory.
            let outcome = Outcome::ConflictOrCapacityMiss;
            self.stats.record_miss(is_write, outcome);
            self.stats.words_stored += 1;
            debug!(cache = %self.name, addr, ?outcome, "write miss, no allocate");
            return AccessOutcome {
                outcome,
                propagate: Some(AccessType::Write),
                writeback: None,
            };
        }

        let free = cache_set.first_invalid();
        let outcome = if free.is_some() {
            Outcome::CompulsoryMiss
        } else {
            Outcome::ConflictOrCapacityMiss
        };
        self.stats.record_miss(is_write, outcome);

        let way = match free {
            Some(way) => way,
            None if ways == 1 => 0,
            None => self.policy.get_victim(cache_set, rng),
        };
        let dirty = is_write && write_policy == Some(WritePolicy::WriteBack);
        let evicted = cache_set.install(way, tag, dirty);
        if ways > 1 {
            self.policy.update(cache_set, way);
        }
        self.stats.words_loaded += words;

        let writeback = if evicted.valid && evicted.dirty {
            self.stats.writebacks += 1;
            self.stats.words_stored += words;
            Some(decoder.block_address(set, evicted.tag))
        } else {
            None
        };
        if is_write && write_policy == Some(WritePolicy::WriteThrough) {
            self.stats.words_stored += 1;
        }

        debug!(
            cache = %self.name,
            addr,
            set,
            way,
            ?outcome,
            evicted_tag = ?evicted.valid.then_some(evicted.tag),
            writeback = writeback.is_some(),
            "miss"
        );

        AccessOutcome {
            outcome,
            propagate: Some(kind),
            writeback,
        }
    }

    /// Checks whether the block holding `addr` is resident.
    pub fn contains(&self, addr: u64) -> bool {
        match self.decoder {
            Some(decoder) => {
                let DecodedAddress { set, tag } = decoder.decode(addr);
                self.sets[set].find(tag).is_some()
            }
            None => false,
        }
    }

    /// Returns `true` if the resident block holding `addr` is dirty.
    pub fn is_dirty(&self, addr: u64) -> bool {
        match self.decoder {
            Some(decoder) => {
                let DecodedAddress { set, tag } = decoder.decode(addr);
                let cache_set = &self.sets[set];
                cache_set
                    .find(tag)
                    .is_some_and(|way| cache_set.block(way).dirty)
            }
            None => false,
        }
    }

    /// Number of valid blocks across all sets.
    pub fn valid_blocks(&self) -> usize {
        self.sets.iter().map(CacheSet::valid_count).sum()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// `None` for a disabled level.
    pub fn decoder(&self) -> Option<&AddressDecoder> {
        self.decoder.as_ref()
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Report label of the second miss class.
    pub fn miss_label(&self) -> &'static str {
        if self.config.associativity > 1 {
            "Capacity"
        } else {
            "Conflict"
        }
    }
}
