use thiserror::Error;

/// Failures decoding a rendered digest back into bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("hex digest must be {expected} characters, got {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("invalid hex character {character:?} at position {index}")]
    InvalidHexCharacter { character: char, index: usize },
}
