// In-memory ledger: genesis creation, proof-of-work and proof-of-stake
// appends, and full re-validation.
//
// SAFETY INVARIANTS:
// 1. The chain is never empty; index 0 is a genesis block mined at difficulty 1
// 2. Every appended block links to the tail's hash at the moment of appending
// 3. Validation trusts no stored hash: each is recomputed from stored fields
// 4. Validation stops at the first failing block and reports it

use cachain_crypto::HashMethod;
use log::info;
use rand::Rng;

use crate::block::Block;
use crate::block_validation::BlockValidator;
use crate::error::{ChainError, IntegrityFailure};
use crate::validator::{Validator, ValidatorRegistry};

pub const GENESIS_PAYLOAD: &str = "Genesis Block";

pub const GENESIS_DIFFICULTY: usize = 1;

#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
    validators: ValidatorRegistry,
    method: HashMethod,
}

impl Blockchain {
    /// Creates a chain whose blocks are all sealed with `method`, starting
    /// from a freshly mined genesis block.
    pub fn new(method: HashMethod) -> Self {
        let mut genesis = Block::new(0, GENESIS_PAYLOAD, String::new(), method);
        // Fresh block, and GENESIS_DIFFICULTY is within the digest length.
        genesis.seal_work(GENESIS_DIFFICULTY);
        info!("Genesis block created with {}: {}", method, genesis.hash);
        Blockchain {
            blocks: vec![genesis],
            validators: ValidatorRegistry::new(),
            method,
        }
    }

    pub fn hash_method(&self) -> HashMethod {
        self.method
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: genesis exists from construction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest_block(&self) -> &Block {
        // Non-empty by construction.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub fn register_validator(&mut self, address: impl Into<String>, stake: f64) -> Result<(), ChainError> {
        self.validators.register(address, stake)
    }

    /// Weighted draw over the registered validators using thread-local entropy.
    pub fn select_validator(&self) -> Result<&Validator, ChainError> {
        self.select_validator_with(&mut rand::thread_rng())
    }

    pub fn select_validator_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Validator, ChainError> {
        self.validators.select(rng)
    }

    fn next_block(&self, payload: impl Into<Vec<u8>>) -> Block {
        Block::new(
            self.blocks.len() as u64,
            payload,
            self.latest_block().hash.clone(),
            self.method,
        )
    }

    /// Appends a block sealed for a stake-weighted validator chosen with
    /// thread-local entropy.
    pub fn append_proof_of_stake(&mut self, payload: impl Into<Vec<u8>>) -> Result<&Block, ChainError> {
        self.append_proof_of_stake_with(payload, &mut rand::thread_rng())
    }

    pub fn append_proof_of_stake_with<R: Rng + ?Sized>(
        &mut self,
        payload: impl Into<Vec<u8>>,
        rng: &mut R,
    ) -> Result<&Block, ChainError> {
        let address = self.validators.select(rng)?.address.clone();
        let mut block = self.next_block(payload);
        block.finalize_proof_of_stake(address)?;
        info!(
            "PoS block {} appended by validator {}",
            block.index,
            block.validator().unwrap_or_default()
        );
        self.blocks.push(block);
        Ok(self.latest_block())
    }

    /// Mines and appends a block, returning the nonce the search reached.
    pub fn append_proof_of_work(
        &mut self,
        payload: impl Into<Vec<u8>>,
        difficulty: usize,
    ) -> Result<u64, ChainError> {
        let mut block = self.next_block(payload);
        let nonce = block.finalize_proof_of_work(difficulty)?;
        self.blocks.push(block);
        Ok(nonce)
    }

    /// Re-validates every non-genesis block in order and reports the first
    /// failure. Checking stops there; later blocks are not inspected.
    pub fn validate(&self) -> Result<(), IntegrityFailure> {
        for (position, pair) in self.blocks.windows(2).enumerate() {
            BlockValidator::validate_full_block(position + 1, &pair[0], &pair[1])?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Blockchain::new(HashMethod::default())
    }
}
