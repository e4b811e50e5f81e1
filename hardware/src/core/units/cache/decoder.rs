//! Address Decoder.
//!
//! Splits a raw address into its cache fields. From most to least
//! significant bit an address is laid out as
//! `[tag | set index | block offset | byte offset]`, where the byte offset
//! selects a byte within a 4-byte word and the block offset selects a word
//! within a block.

use crate::common::{ConfigError, ADDR_BITS, BYTE_BITS};

/// Shift and mask values derived from a cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    set_bits: u32,
    tag_bits: u32,
    set_shift: u32,
    tag_shift: u32,
    set_mask: u64,
    tag_mask: u64,
}

/// The set index and tag of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    pub set: usize,
    pub tag: u64,
}

impl AddressDecoder {
    /// Derives the decoder for a cache with `words_per_block` words per block
    /// and `num_sets` sets.
    ///
    /// # Errors
    ///
    /// Fails if either parameter is not a power of two, or if the geometry
    /// leaves no bits of a [`ADDR_BITS`]-wide address for the tag.
    pub fn new(name: &str, words_per_block: usize, num_sets: usize) -> Result<Self, ConfigError> {
        if !words_per_block.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                cache: name.to_string(),
                what: "words per block",
                value: words_per_block,
            });
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                cache: name.to_string(),
                what: "set count",
                value: num_sets,
            });
        }

        let offset_bits = words_per_block.trailing_zeros();
        let set_bits = num_sets.trailing_zeros();
        let tag_bits = i64::from(ADDR_BITS) - i64::from(BYTE_BITS + offset_bits + set_bits);
        if tag_bits <= 0 {
            return Err(ConfigError::NoTagBits {
                cache: name.to_string(),
                tag_bits,
                addr_bits: ADDR_BITS,
            });
        }
        let tag_bits = tag_bits as u32;

        let set_shift = BYTE_BITS + offset_bits;
        let tag_shift = set_shift + set_bits;

        Ok(Self {
            offset_bits,
            set_bits,
            tag_bits,
            set_shift,
            tag_shift,
            set_mask: (1u64 << set_bits) - 1,
            tag_mask: (1u64 << tag_bits) - 1,
        })
    }

    /// Extracts the set index and tag of `addr`.
    #[inline]
    pub fn decode(&self, addr: u64) -> DecodedAddress {
        DecodedAddress {
            set: self.set_index(addr),
            tag: self.tag(addr),
        }
    }

    #[inline]
    pub fn set_index(&self, addr: u64) -> usize {
        ((addr >> self.set_shift) & self.set_mask) as usize
    }

    #[inline]
    pub fn tag(&self, addr: u64) -> u64 {
        (addr >> self.tag_shift) & self.tag_mask
    }

    /// Rebuilds the address of the first byte of the block holding `tag` in `set`.
    ///
    /// Used to address the write-back of an evicted dirty block.
    pub fn block_address(&self, set: usize, tag: u64) -> u64 {
        (tag << self.tag_shift) | ((set as u64) << self.set_shift)
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn set_bits(&self) -> u32 {
        self.set_bits
    }

    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    pub fn set_shift(&self) -> u32 {
        self.set_shift
    }

    pub fn tag_shift(&self) -> u32 {
        self.tag_shift
    }

    pub fn set_mask(&self) -> u64 {
        self.set_mask
    }

    pub fn tag_mask(&self) -> u64 {
        self.tag_mask
    }
}
