//! Cache hierarchy configuration.
//!
//! Configurations are either deserialized from a TOML file or built from
//! the compact command-line strings accepted by the simulator:
//!
//! * I-cache: `blocks:words:assoc:R|L`, e.g. `4096:1:2:R`.
//! * D-cache: `level:blocks:words:assoc:R|L:B|T:A|N`, e.g. `1:4096:2:4:R:B:A`.
//!
//! Only the string shape and the chain ordering are checked here. Geometry
//! rules (powers of two, divisibility, tag width) are enforced when a
//! [`crate::core::units::cache::CacheLevel`] is built from the config.

use crate::common::{ConfigError, MAX_DCACHE_LEVELS};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

const DEFAULT_SEED: u64 = 1;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub cache: CacheHierarchyConfig,
}

impl Config {
    /// Parses a TOML document and validates the chain ordering.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.cache.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Simulation-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Seed of the generator shared by every Random-policy cache.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Victim selection within a full set.
///
/// Only consulted when the associativity is greater than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evict the least recently used block.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Evict a uniformly chosen block.
    #[serde(alias = "Random")]
    Random,
}

impl ReplacementPolicy {
    fn from_letter(letter: char, cache: &'static str) -> Result<Self, ConfigError> {
        match letter {
            'L' => Ok(ReplacementPolicy::Lru),
            'R' => Ok(ReplacementPolicy::Random),
            _ => Err(ConfigError::InvalidReplacement { cache, letter }),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicy::Lru => write!(f, "LRU"),
            ReplacementPolicy::Random => write!(f, "Random"),
        }
    }
}

/// When a write reaches the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Mark the block dirty and write it out on eviction.
    #[default]
    WriteBack,
    /// Forward every write to the next level immediately.
    WriteThrough,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::WriteBack => write!(f, "write-back"),
            WritePolicy::WriteThrough => write!(f, "write-through"),
        }
    }
}

/// Whether a write miss installs a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AllocatePolicy {
    /// Install the missed block, then apply the write policy.
    #[default]
    Allocate,
    /// Bypass this level on a write miss.
    NoAllocate,
}

impl fmt::Display for AllocatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatePolicy::Allocate => write!(f, "write-allocate"),
            AllocatePolicy::NoAllocate => write!(f, "write-no-allocate"),
        }
    }
}

/// Geometry and replacement policy of one cache level.
///
/// `num_blocks == 0` disables the level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    pub num_blocks: usize,

    #[serde(default = "d_c_words")]
    pub words_per_block: usize,

    #[serde(default = "d_c_ways")]
    pub associativity: usize,

    #[serde(default)]
    pub policy: ReplacementPolicy,
}

fn d_c_words() -> usize {
    1
}

fn d_c_ways() -> usize {
    1
}

impl CacheConfig {
    /// Creates a geometry with the given replacement policy.
    pub fn new(
        num_blocks: usize,
        words_per_block: usize,
        associativity: usize,
        policy: ReplacementPolicy,
    ) -> Self {
        Self {
            num_blocks,
            words_per_block,
            associativity,
            policy,
        }
    }

    /// A configuration with no blocks.
    pub fn disabled() -> Self {
        Self::new(0, 1, 1, ReplacementPolicy::Lru)
    }

    pub fn enabled(&self) -> bool {
        self.num_blocks != 0
    }

    /// Number of sets, `num_blocks / associativity`.
    ///
    /// Returns 0 for a malformed associativity of 0.
    pub fn num_sets(&self) -> usize {
        self.num_blocks.checked_div(self.associativity).unwrap_or(0)
    }

    /// Parses an I-cache string `blocks:words:assoc:R|L`.
    ///
    /// The replacement letter is ignored for direct-mapped caches.
    pub fn parse_icache(input: &str) -> Result<Self, ConfigError> {
        const CACHE: &str = "I-cache";
        let fields: Vec<&str> = input.trim().split(':').collect();
        if fields.len() != 4 {
            return Err(ConfigError::InvalidParameters {
                cache: CACHE,
                input: input.to_string(),
            });
        }
        let num_blocks = parse_number(fields[0], CACHE, input)?;
        let words_per_block = parse_number(fields[1], CACHE, input)?;
        let associativity = parse_number(fields[2], CACHE, input)?;
        let policy = parse_replacement(fields[3], associativity, CACHE, input)?;
        Ok(Self::new(num_blocks, words_per_block, associativity, policy))
    }
}

/// A data cache level: geometry plus write handling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataCacheConfig {
    #[serde(flatten)]
    pub geometry: CacheConfig,

    #[serde(default)]
    pub write_policy: WritePolicy,

    #[serde(default)]
    pub allocate_policy: AllocatePolicy,
}

impl DataCacheConfig {
    pub fn new(
        geometry: CacheConfig,
        write_policy: WritePolicy,
        allocate_policy: AllocatePolicy,
    ) -> Self {
        Self {
            geometry,
            write_policy,
            allocate_policy,
        }
    }

    /// Parses a D-cache string `level:blocks:words:assoc:R|L:B|T:A|N`.
    ///
    /// Returns the 1-based level together with the configuration.
    pub fn parse_dcache(input: &str) -> Result<(usize, Self), ConfigError> {
        const CACHE: &str = "D-cache";
        let fields: Vec<&str> = input.trim().split(':').collect();
        if fields.len() != 7 {
            return Err(ConfigError::InvalidParameters {
                cache: CACHE,
                input: input.to_string(),
            });
        }
        let level = parse_number(fields[0], CACHE, input)?;
        if !(1..=MAX_DCACHE_LEVELS).contains(&level) {
            return Err(ConfigError::InvalidLevel(level));
        }
        let num_blocks = parse_number(fields[1], CACHE, input)?;
        let words_per_block = parse_number(fields[2], CACHE, input)?;
        let associativity = parse_number(fields[3], CACHE, input)?;
        let policy = parse_replacement(fields[4], associativity, CACHE, input)?;

        let write_policy = match parse_letter(fields[5], CACHE, input)? {
            'B' => WritePolicy::WriteBack,
            'T' => WritePolicy::WriteThrough,
            other => return Err(ConfigError::InvalidWriteScheme(other)),
        };
        let allocate_policy = match parse_letter(fields[6], CACHE, input)? {
            'A' => AllocatePolicy::Allocate,
            'N' => AllocatePolicy::NoAllocate,
            other => return Err(ConfigError::InvalidAllocateScheme(other)),
        };

        let geometry = CacheConfig::new(num_blocks, words_per_block, associativity, policy);
        Ok((level, Self::new(geometry, write_policy, allocate_policy)))
    }
}

/// The instruction cache plus a fixed three-slot data cache chain.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheHierarchyConfig {
    pub l1_i: CacheConfig,

    #[serde(default)]
    pub l1_d: Option<DataCacheConfig>,

    #[serde(default)]
    pub l2: Option<DataCacheConfig>,

    #[serde(default)]
    pub l3: Option<DataCacheConfig>,
}

impl CacheHierarchyConfig {
    /// Creates a hierarchy with only an instruction cache.
    pub fn new(l1_i: CacheConfig) -> Self {
        Self {
            l1_i,
            l1_d: None,
            l2: None,
            l3: None,
        }
    }

    /// Builds a hierarchy from `-I` and `-D` argument strings.
    pub fn from_args<S: AsRef<str>>(
        icache: Option<&str>,
        dcache: &[S],
    ) -> Result<Self, ConfigError> {
        let l1_i = CacheConfig::parse_icache(icache.ok_or(ConfigError::MissingICache)?)?;
        let mut config = Self::new(l1_i);
        for spec in dcache {
            let (level, dc) = DataCacheConfig::parse_dcache(spec.as_ref())?;
            let slot = config.slot_mut(level);
            if slot.is_some() {
                return Err(ConfigError::DuplicateLevel(level));
            }
            *slot = Some(dc);
        }
        config.validate()?;
        Ok(config)
    }

    /// The data cache slots in chain order (L1, L2, L3).
    pub fn data_levels(&self) -> [Option<&DataCacheConfig>; MAX_DCACHE_LEVELS] {
        [self.l1_d.as_ref(), self.l2.as_ref(), self.l3.as_ref()]
    }

    fn slot_mut(&mut self, level: usize) -> &mut Option<DataCacheConfig> {
        match level {
            1 => &mut self.l1_d,
            2 => &mut self.l2,
            _ => &mut self.l3,
        }
    }

    /// Checks that no enabled data level follows a disabled one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let enabled = self
            .data_levels()
            .map(|slot| slot.is_some_and(|dc| dc.geometry.enabled()));
        for level in 1..MAX_DCACHE_LEVELS {
            if enabled[level] && !enabled[level - 1] {
                return Err(ConfigError::MissingLevel {
                    level: level + 1,
                    previous: level,
                });
            }
        }
        Ok(())
    }
}

fn parse_number(field: &str, cache: &'static str, input: &str) -> Result<usize, ConfigError> {
    field
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidParameters {
            cache,
            input: input.to_string(),
        })
}

fn parse_letter(field: &str, cache: &'static str, input: &str) -> Result<char, ConfigError> {
    let mut chars = field.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidParameters {
            cache,
            input: input.to_string(),
        }),
    }
}

fn parse_replacement(
    field: &str,
    associativity: usize,
    cache: &'static str,
    input: &str,
) -> Result<ReplacementPolicy, ConfigError> {
    let letter = parse_letter(field, cache, input)?;
    if associativity > 1 {
        ReplacementPolicy::from_letter(letter, cache)
    } else {
        Ok(ReplacementPolicy::Lru)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_letter_ignored_when_direct_mapped() {
        let cfg = CacheConfig::parse_icache("8:1:1:x").unwrap();
        assert_eq!(cfg.policy, ReplacementPolicy::Lru);
        assert!(CacheConfig::parse_icache("8:4:8:x").is_err());
    }

    #[test]
    fn letters_must_be_single_characters() {
        assert!(parse_letter("BB", "D-cache", "").is_err());
        assert!(parse_letter("", "D-cache", "").is_err());
        assert_eq!(parse_letter("T", "D-cache", "").unwrap(), 'T');
    }
}
