// Input folding and digest rendering around the automaton.
//
// Bytes beyond the state width XOR onto earlier positions. The input length
// is XORed in afterwards, so an input and its zero-extended form fold to
// different states.

use crate::automaton::CellularAutomaton;
use crate::bitfield::{BitField, STATE_BYTES};
use crate::error::CodecError;

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = STATE_BYTES * 2;

/// Folds arbitrary-length input into a fixed-width initial state.
pub fn fold(input: &[u8]) -> [u8; STATE_BYTES] {
    let mut state = [0u8; STATE_BYTES];
    for (i, byte) in input.iter().enumerate() {
        state[i % STATE_BYTES] ^= byte;
    }
    let len = input.len() as u64;
    for (i, byte) in len.to_le_bytes().iter().enumerate() {
        state[i % STATE_BYTES] ^= byte;
    }
    state
}

/// Two lowercase hex digits per byte, high nibble first.
pub fn render_hex(state: &[u8; STATE_BYTES]) -> String {
    hex::encode(state)
}

/// Strict inverse of [`render_hex`]. Upper-case digits are accepted.
///
/// Lengths and error positions are in bytes; a reported character is always
/// the full (possibly multi-byte) character starting there.
pub fn decode_hex(digest: &str) -> Result<[u8; STATE_BYTES], CodecError> {
    if digest.len() != DIGEST_HEX_LEN {
        return Err(CodecError::InvalidLength {
            expected: DIGEST_HEX_LEN,
            found: digest.len(),
        });
    }
    if let Some((index, character)) = digest.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidHexCharacter { character, index });
    }
    let mut out = [0u8; STATE_BYTES];
    hex::decode_to_slice(digest, &mut out).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => CodecError::InvalidHexCharacter {
            character: c,
            index,
        },
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            CodecError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                found: digest.len(),
            }
        }
    })?;
    Ok(out)
}

/// Decodes a rendered digest into its bit sequence.
pub fn digest_bits(digest: &str) -> Result<BitField, CodecError> {
    decode_hex(digest).map(BitField::from)
}

/// Raw digest: `evolve(fold(input), rule, steps)`.
pub fn automaton_digest(input: &[u8], rule: u8, steps: usize) -> [u8; STATE_BYTES] {
    let mut automaton = CellularAutomaton::new(rule);
    automaton.seed(&fold(input));
    automaton.evolve(steps);
    automaton.digest()
}

/// `render_hex(evolve(fold(input), rule, steps))`.
pub fn automaton_hash(input: &[u8], rule: u8, steps: usize) -> String {
    render_hex(&automaton_digest(input, rule, steps))
}
