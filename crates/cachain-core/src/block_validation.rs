use crate::block::Block;
use crate::error::IntegrityFailure;

pub struct BlockValidator;

impl BlockValidator {
    /// **Stored hash must equal the hash recomputed from stored fields**
    ///
    /// Detects tampering with any serialized field after sealing.
    pub fn validate_hash(position: usize, block: &Block) -> Result<(), IntegrityFailure> {
        let recomputed = block.recompute_hash();
        if block.hash != recomputed {
            log::warn!(
                "Block {} hash mismatch! Stored {}, recomputed {}",
                position,
                block.hash,
                recomputed
            );
            return Err(IntegrityFailure::HashMismatch {
                index: position,
                stored: block.hash.clone(),
                recomputed,
            });
        }
        Ok(())
    }

    /// **Ensure a block links to its predecessor's stored hash**
    pub fn validate_block_link(
        position: usize,
        prev_block: &Block,
        current_block: &Block,
    ) -> Result<(), IntegrityFailure> {
        if current_block.previous_hash != prev_block.hash {
            log::warn!(
                "Block {} link broken! Expected {}, got {}",
                position,
                prev_block.hash,
                current_block.previous_hash
            );
            return Err(IntegrityFailure::BrokenLink {
                index: position,
                expected: prev_block.hash.clone(),
                found: current_block.previous_hash.clone(),
            });
        }
        Ok(())
    }

    /// **Full per-block check: self-consistency first, then linkage**
    pub fn validate_full_block(
        position: usize,
        prev_block: &Block,
        block: &Block,
    ) -> Result<(), IntegrityFailure> {
        Self::validate_hash(position, block)?;
        Self::validate_block_link(position, prev_block, block)?;
        log::debug!("Block {} passed validation", position);
        Ok(())
    }
}
