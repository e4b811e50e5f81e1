//! Integration tests for address decomposition.

use cachesim::common::{ConfigError, ADDR_BITS, BYTE_BITS};
use cachesim::core::units::cache::decoder::AddressDecoder;
use proptest::prelude::*;

/// Tests shift and mask derivation.
#[test]
fn test_decoder_fields() {
    let decoder = AddressDecoder::new("L1", 4, 16).unwrap();

    assert_eq!(decoder.offset_bits(), 2);
    assert_eq!(decoder.set_bits(), 4);
    assert_eq!(decoder.tag_bits(), 24);
    assert_eq!(decoder.set_shift(), 4);
    assert_eq!(decoder.tag_shift(), 8);
    assert_eq!(decoder.set_mask(), 0xF);
    assert_eq!(decoder.tag_mask(), 0xFF_FFFF);
}

/// Tests decoding a concrete address.
#[test]
fn test_decoder_decode() {
    let decoder = AddressDecoder::new("L1", 4, 16).unwrap();
    let decoded = decoder.decode(0x1234_5678);

    assert_eq!(decoded.set, 0x7);
    assert_eq!(decoded.tag, 0x12_3456);
    assert_eq!(decoder.block_address(decoded.set, decoded.tag), 0x1234_5670);
}

/// Tests a single-set (fully associative) geometry.
#[test]
fn test_decoder_single_set() {
    let decoder = AddressDecoder::new("L1", 1, 1).unwrap();

    assert_eq!(decoder.set_bits(), 0);
    assert_eq!(decoder.set_index(0xFFFF_FFFC), 0);
    assert_eq!(decoder.tag(0xFFFF_FFFC), 0x3FFF_FFFF);
}

/// Tests rejection of non-power-of-two parameters.
#[test]
fn test_decoder_not_power_of_two() {
    assert!(matches!(
        AddressDecoder::new("L1", 3, 4),
        Err(ConfigError::NotPowerOfTwo { value: 3, .. })
    ));
    assert!(matches!(
        AddressDecoder::new("L1", 4, 6),
        Err(ConfigError::NotPowerOfTwo { value: 6, .. })
    ));
    assert!(AddressDecoder::new("L1", 0, 4).is_err());
}

/// Tests rejection of geometries that leave no tag bits.
#[test]
fn test_decoder_no_tag_bits() {
    let result = AddressDecoder::new("L1", 1 << 15, 1 << 15);
    assert!(matches!(
        result,
        Err(ConfigError::NoTagBits { tag_bits: 0, .. })
    ));
    assert!(AddressDecoder::new("L1", 1 << 15, 1 << 14).is_ok());
}

proptest! {
    /// Every address decodes to an in-range set and a tag within the tag width.
    #[test]
    fn prop_decode_in_range(
        offset_bits in 0u32..6,
        set_bits in 0u32..14,
        addr in any::<u32>(),
    ) {
        let words = 1usize << offset_bits;
        let sets = 1usize << set_bits;
        let decoder = AddressDecoder::new("L1", words, sets).unwrap();
        let decoded = decoder.decode(u64::from(addr));

        prop_assert!(decoded.set < sets);
        prop_assert!(decoded.tag < (1u64 << decoder.tag_bits()));
        prop_assert_eq!(
            decoder.tag_bits() + decoder.set_bits() + decoder.offset_bits() + BYTE_BITS,
            ADDR_BITS
        );

        let block_mask = (1u64 << decoder.set_shift()) - 1;
        prop_assert_eq!(
            decoder.block_address(decoded.set, decoded.tag),
            u64::from(addr) & !block_mask
        );
    }
}
