// === Core Ledger Logic ===
pub mod block;
pub mod block_validation;
pub mod blockchain;
pub mod error;

// === Stake ===
pub mod validator;

// === Re-exports for broader ecosystem access ===
pub use block::{meets_difficulty, Block, Seal};
pub use block_validation::BlockValidator;
pub use blockchain::{Blockchain, GENESIS_DIFFICULTY, GENESIS_PAYLOAD};
pub use error::{BlockError, ChainError, FailureKind, IntegrityFailure};
pub use validator::{Validator, ValidatorRegistry};
