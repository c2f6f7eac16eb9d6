// Stake-weighted validator selection.
//
// SAFETY INVARIANTS:
// 1. Every registered stake is finite and non-negative
// 2. Total stake is recomputed on every draw (the set may grow between calls)
// 3. A zero-stake validator is never returned
// 4. Registration order fixes the walk order, not the selection probability

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub address: String,
    pub stake: f64,
}

/// Validators in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator. Negative, NaN or infinite stakes are rejected;
    /// zero is allowed but can never win a draw.
    pub fn register(&mut self, address: impl Into<String>, stake: f64) -> Result<(), ChainError> {
        let address = address.into();
        if !stake.is_finite() || stake < 0.0 {
            return Err(ChainError::InvalidStake { address, stake });
        }
        self.validators.push(Validator { address, stake });
        Ok(())
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn total_stake(&self) -> f64 {
        self.validators.iter().map(|v| v.stake).sum()
    }

    /// Draws a point uniformly in `[0, total_stake)` from `rng` and walks
    /// the registry to the validator covering it.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Validator, ChainError> {
        if self.validators.is_empty() {
            return Err(ChainError::NoValidators);
        }
        let total = self.total_stake();
        if !(total.is_finite() && total > 0.0) {
            return Err(ChainError::DegenerateStake { total });
        }

        let point = rng.gen_range(0.0..total);
        let chosen = self.pick_at(point).ok_or(ChainError::DegenerateStake { total })?;
        info!(
            "Validator selected: {} (stake {} of {}, draw {:.4})",
            chosen.address, chosen.stake, total, point
        );
        Ok(chosen)
    }

    /// Deterministic walk: the first positive-stake validator whose running
    /// stake sum reaches `point`. If rounding leaves `point` beyond the final
    /// sum, the last positive-stake validator is returned.
    pub fn pick_at(&self, point: f64) -> Option<&Validator> {
        let mut running = 0.0;
        for validator in self.validators.iter().filter(|v| v.stake > 0.0) {
            running += validator.stake;
            if point <= running {
                return Some(validator);
            }
        }
        self.validators.iter().rev().find(|v| v.stake > 0.0)
    }
}
