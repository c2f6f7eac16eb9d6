use cachain_crypto::{HashMethod, DIGEST_HEX_LEN};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// How a block was finalised.
///
/// A block starts `Unsealed`, is sealed exactly once, and from then on only
/// its stored fields are read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Seal {
    Unsealed,
    /// Proof-of-work: the nonce that satisfied the difficulty target.
    Work { nonce: u64 },
    /// Proof-of-stake: address of the selected validator.
    Stake { validator: String },
}

/// One ledger entry.
///
/// SAFETY INVARIANTS:
/// 1. Once sealed, `hash` equals `method.digest_hex(preimage)` over the
///    stored fields; chain validation re-checks exactly this
/// 2. `previous_hash` is empty only for the genesis block
/// 3. The nonce is only ever advanced by the mining search (`seal_work`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain
    pub index: u64,

    /// Block creation timestamp (seconds since epoch)
    pub timestamp: u64,

    /// Opaque payload, hashed as raw bytes
    pub payload: Vec<u8>,

    /// Hash of the previous block (immutable link)
    pub previous_hash: String,

    /// Digest used for both sealing and re-validation
    pub method: HashMethod,

    pub seal: Seal,

    /// Hex digest, empty until sealed
    pub hash: String,
}

impl Block {
    /// Creates an unsealed block stamped with the current time.
    pub fn new(
        index: u64,
        payload: impl Into<Vec<u8>>,
        previous_hash: impl Into<String>,
        method: HashMethod,
    ) -> Self {
        let timestamp = Utc::now().timestamp().max(0) as u64;
        Self::with_timestamp(index, timestamp, payload, previous_hash, method)
    }

    /// Creates an unsealed block with an explicit timestamp.
    pub fn with_timestamp(
        index: u64,
        timestamp: u64,
        payload: impl Into<Vec<u8>>,
        previous_hash: impl Into<String>,
        method: HashMethod,
    ) -> Self {
        Self {
            index,
            timestamp,
            payload: payload.into(),
            previous_hash: previous_hash.into(),
            method,
            seal: Seal::Unsealed,
            hash: String::new(),
        }
    }

    /// Canonical preimage shared by both seals: decimal index, decimal
    /// timestamp, raw payload and previous hash, in that order. The seal
    /// field is appended by the caller.
    fn preimage_prefix(&self) -> Vec<u8> {
        let index = self.index.to_string();
        let timestamp = self.timestamp.to_string();
        let mut buf = Vec::with_capacity(
            index.len() + timestamp.len() + self.payload.len() + self.previous_hash.len() + 20,
        );
        buf.extend_from_slice(index.as_bytes());
        buf.extend_from_slice(timestamp.as_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(self.previous_hash.as_bytes());
        buf
    }

    fn ensure_unsealed(&self) -> Result<(), BlockError> {
        if self.is_sealed() {
            return Err(BlockError::AlreadySealed { index: self.index });
        }
        Ok(())
    }

    /// Mines the block: searches nonces from zero until the digest starts
    /// with `difficulty` zero characters. Returns the winning nonce.
    ///
    /// The search has no iteration bound; expected work is `16^difficulty`.
    pub fn finalize_proof_of_work(&mut self, difficulty: usize) -> Result<u64, BlockError> {
        self.ensure_unsealed()?;
        if difficulty > DIGEST_HEX_LEN {
            return Err(BlockError::DifficultyOutOfRange {
                difficulty,
                max: DIGEST_HEX_LEN,
            });
        }

        Ok(self.seal_work(difficulty))
    }

    /// Nonce search behind `finalize_proof_of_work`; the only code that
    /// advances a nonce. Callers guarantee the block is unsealed and the
    /// difficulty fits the digest.
    pub(crate) fn seal_work(&mut self, difficulty: usize) -> u64 {
        let mut preimage = self.preimage_prefix();
        let prefix_len = preimage.len();
        let mut nonce: u64 = 0;
        let hash = loop {
            preimage.truncate(prefix_len);
            preimage.extend_from_slice(nonce.to_string().as_bytes());
            let candidate = self.method.digest_hex(&preimage);
            if meets_difficulty(&candidate, difficulty) {
                break candidate;
            }
            nonce += 1;
        };

        info!(
            "Block {} mined: method={}, difficulty={}, nonce={}, hash={}",
            self.index,
            self.method,
            difficulty,
            nonce,
            &hash[..16]
        );

        self.seal = Seal::Work { nonce };
        self.hash = hash;
        nonce
    }

    /// Seals the block for `validator` with a single digest computation.
    pub fn finalize_proof_of_stake(&mut self, validator: impl Into<String>) -> Result<(), BlockError> {
        self.ensure_unsealed()?;
        self.seal = Seal::Stake {
            validator: validator.into(),
        };
        self.hash = self.recompute_hash();
        Ok(())
    }

    /// Rebuilds the digest from the stored fields using whichever seal the
    /// block carries. Never mutates the block.
    pub fn recompute_hash(&self) -> String {
        let mut preimage = self.preimage_prefix();
        match &self.seal {
            Seal::Unsealed => {}
            Seal::Work { nonce } => preimage.extend_from_slice(nonce.to_string().as_bytes()),
            Seal::Stake { validator } => preimage.extend_from_slice(validator.as_bytes()),
        }
        self.method.digest_hex(&preimage)
    }

    pub fn is_sealed(&self) -> bool {
        !matches!(self.seal, Seal::Unsealed)
    }

    pub fn nonce(&self) -> Option<u64> {
        match self.seal {
            Seal::Work { nonce } => Some(nonce),
            _ => None,
        }
    }

    pub fn validator(&self) -> Option<&str> {
        match &self.seal {
            Seal::Stake { validator } => Some(validator),
            _ => None,
        }
    }

    /// True when the stored hash carries `difficulty` leading zeros.
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }
}

/// True when the first `difficulty` characters of `hash` are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}
