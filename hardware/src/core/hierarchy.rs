//! Memory hierarchy.
//!
//! Owns the instruction cache, the three data cache slots and the random
//! source shared by every Random-policy level. Instruction fetches go to
//! the instruction cache only; reads and writes start at L1 and walk down
//! the data chain while a level asks for propagation. Main memory ends
//! every chain and always satisfies the access.

use crate::common::{AccessType, ConfigError, MAX_DCACHE_LEVELS};
use crate::config::{CacheConfig, CacheHierarchyConfig, Config, DataCacheConfig};
use crate::core::units::cache::policies::{RandomSource, SeededRandom};
use crate::core::units::cache::{CacheLevel, Outcome};
use tracing::{info, trace};

/// Where an access was finally satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServedBy {
    ICache,
    /// Data cache level, 1-based.
    DCache(usize),
    Memory,
}

/// Result of [`Hierarchy::handle_access`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HierarchyOutcome {
    /// Outcome at the first enabled level of the chain, or
    /// [`Outcome::Bypass`] when every level of the chain is disabled.
    pub outcome: Outcome,
    pub served_by: ServedBy,
}

/// The simulated memory hierarchy.
pub struct Hierarchy {
    icache: CacheLevel,
    dcache: [CacheLevel; MAX_DCACHE_LEVELS],
    rng: Box<dyn RandomSource>,
    accesses: u64,
}

impl Hierarchy {
    /// Builds the hierarchy described by a full configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.cache, config.general.seed)
    }

    /// Builds a hierarchy whose Random policies draw from a generator seeded with `seed`.
    pub fn new(config: &CacheHierarchyConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Box::new(SeededRandom::new(seed)))
    }

    /// Builds a hierarchy with an explicit random source.
    ///
    /// # Errors
    ///
    /// Fails if the data chain skips a level or if any enabled level has
    /// an invalid geometry.
    pub fn with_rng(
        config: &CacheHierarchyConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let icache = CacheLevel::instruction("I-Cache", &config.l1_i)?;
        let [l1, l2, l3] = config.data_levels();
        let dcache = [
            build_data_level(1, l1)?,
            build_data_level(2, l2)?,
            build_data_level(3, l3)?,
        ];

        let hierarchy = Self {
            icache,
            dcache,
            rng,
            accesses: 0,
        };
        for level in hierarchy.levels() {
            let cfg = level.config();
            info!(
                cache = level.name(),
                blocks = cfg.num_blocks,
                words_per_block = cfg.words_per_block,
                ways = cfg.associativity,
                sets = cfg.num_sets(),
                "configured"
            );
        }
        Ok(hierarchy)
    }

    /// Simulates one access from the trace.
    pub fn handle_access(&mut self, kind: AccessType, addr: u64) -> HierarchyOutcome {
        self.accesses += 1;
        trace!(?kind, addr, "access");
        match kind {
            AccessType::Fetch => self.fetch(addr),
            AccessType::Read | AccessType::Write => self.access_data(0, kind, addr),
        }
    }

    fn fetch(&mut self, addr: u64) -> HierarchyOutcome {
        let result = self
            .icache
            .access(AccessType::Fetch, addr, self.rng.as_mut());
        let served_by = if result.outcome.is_hit() {
            ServedBy::ICache
        } else {
            ServedBy::Memory
        };
        HierarchyOutcome {
            outcome: result.outcome,
            served_by,
        }
    }

    /// Issues `kind` at data level `start` (0-based) and below.
    fn access_data(&mut self, start: usize, kind: AccessType, addr: u64) -> HierarchyOutcome {
        let mut first = None;
        let mut served_by = None;
        let mut kind = kind;

        for idx in start..MAX_DCACHE_LEVELS {
            if !self.dcache[idx].enabled {
                continue;
            }
            let result = self.dcache[idx].access(kind, addr, self.rng.as_mut());
            first.get_or_insert(result.outcome);
            if result.outcome.is_hit() && served_by.is_none() {
                served_by = Some(ServedBy::DCache(idx + 1));
            }
            if let Some(victim) = result.writeback {
                self.access_data(idx + 1, AccessType::Write, victim);
            }
            match result.propagate {
                Some(next) => kind = next,
                None => break,
            }
        }

        HierarchyOutcome {
            outcome: first.unwrap_or(Outcome::Bypass),
            served_by: served_by.unwrap_or(ServedBy::Memory),
        }
    }

    pub fn icache(&self) -> &CacheLevel {
        &self.icache
    }

    /// Data cache `level` (1-based), if configured and enabled.
    pub fn dcache(&self, level: usize) -> Option<&CacheLevel> {
        level
            .checked_sub(1)
            .and_then(|idx| self.dcache.get(idx))
            .filter(|cache| cache.enabled)
    }

    /// Every enabled level, instruction cache first.
    pub fn levels(&self) -> impl Iterator<Item = &CacheLevel> {
        std::iter::once(&self.icache)
            .chain(self.dcache.iter())
            .filter(|cache| cache.enabled)
    }

    /// Accesses handled so far.
    pub fn accesses(&self) -> u64 {
        self.accesses
    }
}

fn build_data_level(
    level: usize,
    config: Option<&DataCacheConfig>,
) -> Result<CacheLevel, ConfigError> {
    let name = format!("L{} D-Cache", level);
    match config {
        Some(dc) => CacheLevel::data(&name, dc),
        None => {
            let disabled =
                DataCacheConfig::new(CacheConfig::disabled(), Default::default(), Default::default());
            CacheLevel::data(&name, &disabled)
        }
    }
}
