//! Cellular-automaton hashing for the cachain ledger.
//!
//! Input bytes are folded into a 256-bit ring, evolved under an elementary
//! automaton rule and rendered as 64 lowercase hex characters. SHA-256 is
//! available behind the same [`HashFunction`] contract as a reference.

pub mod analysis;
pub mod automaton;
pub mod bitfield;
pub mod codec;
pub mod error;
pub mod hash;

pub use analysis::{avalanche, bit_distribution, hamming_distance_hex, AvalancheReport, DistributionReport};
pub use automaton::CellularAutomaton;
pub use bitfield::{BitField, STATE_BITS, STATE_BYTES};
pub use codec::{automaton_digest, automaton_hash, decode_hex, digest_bits, fold, render_hex, DIGEST_HEX_LEN};
pub use error::CodecError;
pub use hash::{AutomatonHash, HashFunction, HashMethod, Sha256Hash, DEFAULT_RULE, DEFAULT_STEPS};
