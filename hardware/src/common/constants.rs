//! Address geometry constants.

/// Width of a simulated address in bits.
pub const ADDR_BITS: u32 = 32;

/// Number of low address bits selecting a byte within a word.
pub const BYTE_BITS: u32 = 2;

/// Maximum depth of the data cache chain (L1, L2, L3).
pub const MAX_DCACHE_LEVELS: usize = 3;
