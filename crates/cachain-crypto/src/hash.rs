use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::codec::automaton_hash;

/// Rule used by the ledger unless configured otherwise.
pub const DEFAULT_RULE: u8 = 30;

/// Generations evolved by the ledger unless configured otherwise.
pub const DEFAULT_STEPS: usize = 128;

/// Shared contract of every digest the ledger can use: bytes in, 64 lowercase
/// hex characters out.
pub trait HashFunction {
    fn digest_hex(&self, input: &[u8]) -> String;
}

/// Reference digest (SHA-256).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn digest_hex(&self, input: &[u8]) -> String {
        hex::encode(Sha256::digest(input))
    }
}

/// Cellular-automaton digest with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomatonHash {
    pub rule: u8,
    pub steps: usize,
}

impl Default for AutomatonHash {
    fn default() -> Self {
        AutomatonHash {
            rule: DEFAULT_RULE,
            steps: DEFAULT_STEPS,
        }
    }
}

impl HashFunction for AutomatonHash {
    fn digest_hex(&self, input: &[u8]) -> String {
        automaton_hash(input, self.rule, self.steps)
    }
}

/// Which digest a block is sealed with. This is the single dispatch point
/// between the two implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HashMethod {
    Sha256,
    Automaton {
        #[serde(default = "default_rule")]
        rule: u8,
        #[serde(default = "default_steps")]
        steps: usize,
    },
}

fn default_rule() -> u8 {
    DEFAULT_RULE
}

fn default_steps() -> usize {
    DEFAULT_STEPS
}

impl HashMethod {
    pub fn automaton(rule: u8, steps: usize) -> Self {
        HashMethod::Automaton { rule, steps }
    }

    pub fn digest_hex(&self, input: &[u8]) -> String {
        match *self {
            HashMethod::Sha256 => Sha256Hash.digest_hex(input),
            HashMethod::Automaton { rule, steps } => AutomatonHash { rule, steps }.digest_hex(input),
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Default for HashMethod {
    fn default() -> Self {
        HashMethod::Automaton {
            rule: DEFAULT_RULE,
            steps: DEFAULT_STEPS,
        }
    }
}

impl HashFunction for HashMethod {
    fn digest_hex(&self, input: &[u8]) -> String {
        HashMethod::digest_hex(self, input)
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashMethod::Sha256 => write!(f, "SHA256"),
            HashMethod::Automaton { rule, steps } => {
                write!(f, "AC_HASH(rule {}, {} steps)", rule, steps)
            }
        }
    }
}
