use thiserror::Error;

/// Failures finalising a single block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block {index} is already sealed")]
    AlreadySealed { index: u64 },

    #[error("difficulty {difficulty} exceeds digest length {max}")]
    DifficultyOutOfRange { difficulty: usize, max: usize },
}

/// Failures appending to a chain or configuring its validators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("no validators registered; stake-based append is not possible")]
    NoValidators,

    #[error("validator {address} has invalid stake {stake}")]
    InvalidStake { address: String, stake: f64 },

    #[error("total stake {total} admits no weighted draw")]
    DegenerateStake { total: f64 },

    #[error(transparent)]
    Block(#[from] BlockError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    HashMismatch,
    BrokenLink,
}

/// First integrity violation found while re-validating a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityFailure {
    #[error("block {index}: stored hash {stored} differs from recomputed {recomputed}")]
    HashMismatch {
        index: usize,
        stored: String,
        recomputed: String,
    },

    #[error("block {index}: previous_hash {found} does not match predecessor hash {expected}")]
    BrokenLink {
        index: usize,
        expected: String,
        found: String,
    },
}

impl IntegrityFailure {
    /// Position of the failing block in the chain.
    pub fn index(&self) -> usize {
        match self {
            IntegrityFailure::HashMismatch { index, .. } | IntegrityFailure::BrokenLink { index, .. } => *index,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            IntegrityFailure::HashMismatch { .. } => FailureKind::HashMismatch,
            IntegrityFailure::BrokenLink { .. } => FailureKind::BrokenLink,
        }
    }
}
