// Statistical checks on the automaton digest: avalanche sensitivity and
// output bit balance.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bitfield::{BitField, STATE_BITS};
use crate::codec::{automaton_digest, digest_bits, render_hex};
use crate::error::CodecError;

/// Prefix of the generated inputs used by [`bit_distribution`].
pub const DISTRIBUTION_INPUT_PREFIX: &str = "un_message_different_pour_le_test_";

/// Comparison input for an empty message. `0x01` would fold to the same
/// all-zero state as the empty input once the length is XORed in.
pub const EMPTY_INPUT_FLIP: u8 = 0x80;

/// Number of differing bits between two rendered digests.
pub fn hamming_distance_hex(a: &str, b: &str) -> Result<u32, CodecError> {
    Ok(digest_bits(a)?.hamming_distance(&digest_bits(b)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvalancheGrade {
    Excellent,
    Good,
    Weak,
}

impl AvalancheGrade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 45.0 && percentage < 55.0 {
            AvalancheGrade::Excellent
        } else if percentage > 40.0 && percentage < 60.0 {
            AvalancheGrade::Good
        } else {
            AvalancheGrade::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheReport {
    pub original: Vec<u8>,
    pub flipped: Vec<u8>,
    pub original_digest: String,
    pub flipped_digest: String,
    pub differing_bits: u32,
    pub percentage: f64,
    pub grade: AvalancheGrade,
}

/// Hashes `input` and the same input with the low bit of its last byte
/// flipped. An empty input is compared against `[EMPTY_INPUT_FLIP]`.
pub fn avalanche(input: &[u8], rule: u8, steps: usize) -> AvalancheReport {
    let original = input.to_vec();
    let mut flipped = original.clone();
    match flipped.last_mut() {
        Some(last) => *last ^= 0x01,
        None => flipped.push(EMPTY_INPUT_FLIP),
    }

    let a = automaton_digest(&original, rule, steps);
    let b = automaton_digest(&flipped, rule, steps);
    let differing_bits = BitField::from(a).hamming_distance(&BitField::from(b));
    let percentage = f64::from(differing_bits) / STATE_BITS as f64 * 100.0;

    log::debug!(
        "avalanche: rule={}, steps={}, differing_bits={}",
        rule,
        steps,
        differing_bits
    );

    AvalancheReport {
        original,
        flipped,
        original_digest: render_hex(&a),
        flipped_digest: render_hex(&b),
        differing_bits,
        percentage,
        grade: AvalancheGrade::from_percentage(percentage),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceGrade {
    VeryBalanced,
    Acceptable,
    Unbalanced,
}

impl BalanceGrade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 49.0 && percentage < 51.0 {
            BalanceGrade::VeryBalanced
        } else if percentage > 45.0 && percentage < 55.0 {
            BalanceGrade::Acceptable
        } else {
            BalanceGrade::Unbalanced
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    pub samples: usize,
    pub total_bits: u64,
    pub ones: u64,
    pub percentage: f64,
    pub grade: BalanceGrade,
}

/// Share of one-bits across `samples` digests of distinct generated inputs.
pub fn bit_distribution(samples: usize, rule: u8, steps: usize) -> DistributionReport {
    let ones: u64 = (0..samples)
        .into_par_iter()
        .map(|i| {
            let input = format!("{}{}", DISTRIBUTION_INPUT_PREFIX, i);
            let digest = automaton_digest(input.as_bytes(), rule, steps);
            u64::from(BitField::from(digest).count_ones())
        })
        .sum();

    let total_bits = samples as u64 * STATE_BITS as u64;
    let percentage = if total_bits > 0 {
        ones as f64 / total_bits as f64 * 100.0
    } else {
        0.0
    };

    DistributionReport {
        samples,
        total_bits,
        ones,
        percentage,
        grade: BalanceGrade::from_percentage(percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{fold, DIGEST_HEX_LEN};

    #[test]
    fn test_hamming_distance_hex() {
        let zero = "0".repeat(DIGEST_HEX_LEN);
        let mut one = zero.clone();
        one.replace_range(0..1, "f");
        assert_eq!(hamming_distance_hex(&zero, &one), Ok(4));
        assert_eq!(hamming_distance_hex(&zero, &zero), Ok(0));
    }

    #[test]
    fn test_hamming_distance_rejects_bad_digest() {
        assert!(hamming_distance_hex("00", "00").is_err());
    }

    #[test]
    fn test_avalanche_flips_exactly_one_input_bit() {
        let report = avalanche(b"Bonjour le monde de la blockchain.", 30, 128);
        let differing: u32 = report
            .original
            .iter()
            .zip(report.flipped.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        assert_eq!(differing, 1);
        assert_eq!(report.flipped.last(), Some(&b'/'));
        assert_ne!(report.original_digest, report.flipped_digest);
        assert!(report.differing_bits > 0);
    }

    #[test]
    fn test_avalanche_on_empty_input() {
        let report = avalanche(b"", 30, 128);
        assert_eq!(report.flipped, vec![EMPTY_INPUT_FLIP]);
        assert_ne!(fold(&report.original), fold(&report.flipped));
        assert_ne!(report.original_digest, report.flipped_digest);
        assert!(report.differing_bits > 0);
    }

    #[test]
    fn test_identity_rule_has_weak_avalanche() {
        // Rule 204 never mixes, so one input bit changes one output bit.
        let report = avalanche(b"abc", 204, 128);
        assert_eq!(report.differing_bits, 1);
        assert_eq!(report.grade, AvalancheGrade::Weak);
    }

    #[test]
    fn test_grades() {
        assert_eq!(AvalancheGrade::from_percentage(50.0), AvalancheGrade::Excellent);
        assert_eq!(AvalancheGrade::from_percentage(42.0), AvalancheGrade::Good);
        assert_eq!(AvalancheGrade::from_percentage(10.0), AvalancheGrade::Weak);
        assert_eq!(BalanceGrade::from_percentage(50.2), BalanceGrade::VeryBalanced);
        assert_eq!(BalanceGrade::from_percentage(47.0), BalanceGrade::Acceptable);
        assert_eq!(BalanceGrade::from_percentage(30.0), BalanceGrade::Unbalanced);
    }

    #[test]
    fn test_distribution_counts_every_bit() {
        let report = bit_distribution(20, 30, 128);
        assert_eq!(report.samples, 20);
        assert_eq!(report.total_bits, 20 * STATE_BITS as u64);
        assert!(report.ones <= report.total_bits);
        assert!(report.percentage > 0.0 && report.percentage < 100.0);
    }

    #[test]
    fn test_distribution_of_null_rule_is_all_zero() {
        let report = bit_distribution(4, 0, 1);
        assert_eq!(report.ones, 0);
        assert_eq!(report.grade, BalanceGrade::Unbalanced);
    }

    #[test]
    fn test_distribution_without_samples() {
        let report = bit_distribution(0, 30, 128);
        assert_eq!(report.total_bits, 0);
        assert_eq!(report.percentage, 0.0);
    }
}
