// Fixed-width packed bit buffer with ring addressing.
//
// INVARIANTS:
// 1. Width is STATE_BITS (a power of two); storage is STATE_BYTES packed bytes
// 2. Bit 0 is the most significant bit of byte 0 (MSB-first within each byte)
// 3. Every index is reduced into [0, STATE_BITS) before use; nothing is rejected

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the automaton state and of every digest, in bits.
pub const STATE_BITS: usize = 256;

/// Width of the automaton state and of every digest, in bytes.
pub const STATE_BYTES: usize = STATE_BITS / 8;

const INDEX_MASK: usize = STATE_BITS - 1;

const _: () = assert!(STATE_BITS.is_power_of_two() && STATE_BITS % 8 == 0);

/// Densely packed, fixed-size binary buffer whose ends are adjacent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitField {
    bytes: [u8; STATE_BYTES],
}

impl BitField {
    /// All-zero field.
    pub fn new() -> Self {
        BitField {
            bytes: [0u8; STATE_BYTES],
        }
    }

    /// Copies up to `STATE_BYTES` bytes, zero-padding a short input and
    /// truncating a long one.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut field = BitField::new();
        let len = data.len().min(STATE_BYTES);
        field.bytes[..len].copy_from_slice(&data[..len]);
        field
    }

    /// Zero field with exactly one bit set.
    pub fn with_single_bit(index: isize) -> Self {
        let mut field = BitField::new();
        field.set(index, true);
        field
    }

    /// Maps any logical index, negative ones included, onto the ring.
    #[inline]
    fn wrap(index: isize) -> usize {
        // Two's-complement reinterpretation keeps the mask exact for negatives.
        (index as usize) & INDEX_MASK
    }

    #[inline]
    fn locate(index: isize) -> (usize, u8) {
        let bit = Self::wrap(index);
        (bit >> 3, 7 - (bit & 7) as u8)
    }

    /// Bit at logical `index`, wrapped modulo `STATE_BITS`.
    #[inline]
    pub fn get(&self, index: isize) -> bool {
        let (byte, shift) = Self::locate(index);
        (self.bytes[byte] >> shift) & 1 == 1
    }

    /// Writes one bit without touching its neighbours in the same byte.
    #[inline]
    pub fn set(&mut self, index: isize, value: bool) {
        let (byte, shift) = Self::locate(index);
        if value {
            self.bytes[byte] |= 1 << shift;
        } else {
            self.bytes[byte] &= !(1 << shift);
        }
    }

    pub fn as_bytes(&self) -> &[u8; STATE_BYTES] {
        &self.bytes
    }

    pub fn into_bytes(self) -> [u8; STATE_BYTES] {
        self.bytes
    }

    /// Bits in logical order, index 0 first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..STATE_BITS as isize).map(move |i| self.get(i))
    }

    pub fn count_ones(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// Number of positions at which the two fields differ.
    pub fn hamming_distance(&self, other: &BitField) -> u32 {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

impl Default for BitField {
    fn default() -> Self {
        BitField::new()
    }
}

impl From<[u8; STATE_BYTES]> for BitField {
    fn from(bytes: [u8; STATE_BYTES]) -> Self {
        BitField { bytes }
    }
}

impl fmt::Debug for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitField({})", hex::encode(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_field_is_zero() {
        let field = BitField::new();
        assert_eq!(field.count_ones(), 0);
        assert!(field.iter().all(|b| !b));
    }

    #[test]
    fn test_msb_first_layout() {
        let mut field = BitField::new();
        field.set(0, true);
        field.set(15, true);
        assert_eq!(field.as_bytes()[0], 0x80);
        assert_eq!(field.as_bytes()[1], 0x01);
    }

    #[test]
    fn test_set_preserves_neighbours() {
        let mut field = BitField::from_bytes(&[0xff]);
        field.set(3, false);
        assert_eq!(field.as_bytes()[0], 0b1110_1111);
        field.set(3, true);
        assert_eq!(field.as_bytes()[0], 0xff);
    }

    #[test]
    fn test_negative_index_wraps_to_high_end() {
        let mut field = BitField::new();
        field.set(STATE_BITS as isize - 1, true);
        assert!(field.get(-1));
        assert!(!field.get(-2));
        assert_eq!(field.as_bytes()[STATE_BYTES - 1], 0x01);
    }

    #[test]
    fn test_overflowing_index_wraps_to_low_end() {
        let field = BitField::with_single_bit(0);
        assert!(field.get(STATE_BITS as isize));
        assert!(field.get(2 * STATE_BITS as isize));
    }

    #[test]
    fn test_from_bytes_pads_and_truncates() {
        let short = BitField::from_bytes(&[0xaa, 0xbb]);
        assert_eq!(&short.as_bytes()[..2], &[0xaa, 0xbb]);
        assert!(short.as_bytes()[2..].iter().all(|b| *b == 0));

        let long: Vec<u8> = (0..40u8).collect();
        let truncated = BitField::from_bytes(&long);
        assert_eq!(truncated.as_bytes()[..], long[..STATE_BYTES]);
    }

    #[test]
    fn test_hamming_distance() {
        let a = BitField::from_bytes(&[0b1010_0000]);
        let b = BitField::from_bytes(&[0b0110_0000, 0x01]);
        assert_eq!(a.hamming_distance(&b), 3);
        assert_eq!(a.hamming_distance(&a), 0);
    }

    proptest! {
        #[test]
        fn prop_get_matches_euclidean_modulo(index in -4096isize..4096, bit in 0usize..STATE_BITS) {
            let field = BitField::with_single_bit(bit as isize);
            let expected = index.rem_euclid(STATE_BITS as isize) as usize == bit;
            prop_assert_eq!(field.get(index), expected);
        }

        #[test]
        fn prop_set_then_get(bytes in proptest::collection::vec(any::<u8>(), STATE_BYTES), index in any::<isize>(), value in any::<bool>()) {
            let mut field = BitField::from_bytes(&bytes);
            let before = field;
            field.set(index, value);
            prop_assert_eq!(field.get(index), value);
            prop_assert!(field.hamming_distance(&before) <= 1);
        }
    }
}
