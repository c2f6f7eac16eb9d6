//! cachain: a 256-bit cellular-automaton hash and the small ledger that
//! seals its blocks with it.
//!
//! The member crates do the work; this crate only gathers them under one
//! name.

pub use cachain_core;
pub use cachain_crypto;

pub use cachain_core::{
    Block, BlockError, BlockValidator, Blockchain, ChainError, FailureKind, IntegrityFailure, Seal, Validator,
    ValidatorRegistry,
};
pub use cachain_crypto::{automaton_hash, HashFunction, HashMethod};
