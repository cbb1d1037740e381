//! Core types for the issuance calculator

use crate::errors::IssuanceError;
use serde::{Deserialize, Serialize};

/// Chain height (block number)
pub type BlockHeight = u64;

/// Mint rate in gwei per L1 calldata gas unit
pub type MintRateGwei = u64;

/// Whole-token issuance amount
pub type Tokens = f64;

/// Blocks in one adjustment period
pub const PERIOD_LENGTH: u64 = 10_000;

/// Blocks in one halving epoch (~1 year)
pub const BLOCKS_PER_HALVING: u64 = 2_630_000;

/// Issuance target per adjustment period during epoch 0
pub const INITIAL_TARGET: u64 = 400_000;

/// Hard ceiling on the mint rate, in gwei
pub const ABSOLUTE_MAX_RATE: MintRateGwei = 10_000_000;

/// Floor on any forecasted mint rate
pub const MIN_RATE: MintRateGwei = 1;

/// Protocol parameters driving the halving and adjustment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceParams {
    /// Adjustment period length in blocks
    pub period_length: u64,
    /// Halving epoch length in blocks
    pub blocks_per_halving: u64,
    /// Per-period issuance target before any halving
    pub initial_target: u64,
    /// Absolute maximum mint rate in gwei
    pub absolute_max_rate: MintRateGwei,
}

impl Default for IssuanceParams {
    fn default() -> Self {
        Self {
            period_length: PERIOD_LENGTH,
            blocks_per_halving: BLOCKS_PER_HALVING,
            initial_target: INITIAL_TARGET,
            absolute_max_rate: ABSOLUTE_MAX_RATE,
        }
    }
}

impl IssuanceParams {
    /// Reject parameter sets that would make window arithmetic divide by zero.
    pub fn validate(&self) -> Result<(), IssuanceError> {
        if self.period_length == 0 {
            return Err(IssuanceError::InvalidParameter("period_length must be positive"));
        }
        if self.blocks_per_halving == 0 {
            return Err(IssuanceError::InvalidParameter(
                "blocks_per_halving must be positive",
            ));
        }
        if self.absolute_max_rate < MIN_RATE {
            return Err(IssuanceError::InvalidParameter(
                "absolute_max_rate must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Validate a height reported by an untyped upstream source.
pub fn validate_height(raw: i64) -> Result<BlockHeight, IssuanceError> {
    BlockHeight::try_from(raw).map_err(|_| {
        IssuanceError::invalid_input(format!("height must be non-negative, got {raw}"))
    })
}
