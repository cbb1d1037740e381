use crate::errors::IssuanceError;
use crate::types::{BlockHeight, IssuanceParams};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Position of a height within its adjustment period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodState {
    pub height: BlockHeight,
    /// One-based index of the period
    pub period_index: u64,
    pub start_block: BlockHeight,
    /// Last block of the period (inclusive)
    pub end_block: BlockHeight,
    /// Blocks produced so far, including `height`
    pub blocks_elapsed: u64,
    pub blocks_remaining: u64,
}

impl PeriodState {
    pub fn period_length(&self) -> u64 {
        self.blocks_elapsed + self.blocks_remaining
    }

    pub fn progress_percent(&self) -> f64 {
        self.blocks_elapsed as f64 / self.period_length() as f64 * 100.0
    }
}

/// Compute the adjustment-period state for the given chain height.
pub fn compute_period_state(
    height: BlockHeight,
    params: &IssuanceParams,
) -> Result<PeriodState, IssuanceError> {
    let length = params.period_length.max(1);
    let period_index = height / length + 1;
    let start_block = (period_index - 1) * length;
    let end_block = start_block
        .checked_add(length - 1)
        .ok_or(IssuanceError::CalculationOverflow("adjustment period end block"))?;
    let blocks_elapsed = height - start_block + 1;

    Ok(PeriodState {
        height,
        period_index,
        start_block,
        end_block,
        blocks_elapsed,
        blocks_remaining: length - blocks_elapsed,
    })
}

/// Detects when the chain crosses into a later adjustment period, at which
/// point the mint rate has been re-set on chain and history has grown.
#[derive(Debug, Clone, Default)]
pub struct PeriodRolloverTracker {
    last_period: u64,
}

impl PeriodRolloverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that treats the period of `height` as already seen.
    pub fn starting_at(height: BlockHeight, params: &IssuanceParams) -> Self {
        Self {
            last_period: height / params.period_length.max(1),
        }
    }

    /// Zero-based period most recently recorded.
    pub fn last_period(&self) -> u64 {
        self.last_period
    }

    /// Record `height`; returns `true` if it lies in a later period than any
    /// height seen before.
    pub fn observe(&mut self, height: BlockHeight, params: &IssuanceParams) -> bool {
        let current = height / params.period_length.max(1);
        if current > self.last_period {
            debug!(from = self.last_period, to = current, "adjustment period rolled over");
            self.last_period = current;
            true
        } else {
            false
        }
    }
}
