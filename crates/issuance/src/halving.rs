use crate::errors::IssuanceError;
use crate::types::{BlockHeight, IssuanceParams};
use serde::{Deserialize, Serialize};

/// Position of a height within the halving schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalvingState {
    pub height: BlockHeight,
    pub epoch: u64,
    pub start_block: BlockHeight,
    /// Last block of the epoch (inclusive)
    pub end_block: BlockHeight,
    pub blocks_elapsed: u64,
    pub blocks_remaining: u64,
    /// Per-period issuance target for this epoch
    pub current_target: u64,
    /// `current_target / 2` without flooring, as reported by the dashboard
    pub next_target: f64,
    /// Floored target of the following epoch
    pub next_epoch_target: u64,
}

impl HalvingState {
    /// Share of the epoch already produced, in percent.
    pub fn progress_percent(&self) -> f64 {
        let len = self.blocks_elapsed + self.blocks_remaining;
        if len == 0 {
            return 0.0;
        }
        self.blocks_elapsed as f64 / len as f64 * 100.0
    }
}

/// Halving epoch containing `height`.
pub fn halving_epoch(height: BlockHeight, params: &IssuanceParams) -> u64 {
    height / params.blocks_per_halving.max(1)
}

/// Per-period issuance target for `epoch`: `floor(initial_target / 2^epoch)`.
pub fn target_for_epoch(epoch: u64, params: &IssuanceParams) -> u64 {
    u32::try_from(epoch)
        .ok()
        .and_then(|shift| params.initial_target.checked_shr(shift))
        .unwrap_or(0)
}

/// Compute the halving state for the given chain height.
///
/// Fails with `CalculationOverflow` in the trailing epoch whose last block
/// would lie past `u64::MAX`.
pub fn compute_halving_state(
    height: BlockHeight,
    params: &IssuanceParams,
) -> Result<HalvingState, IssuanceError> {
    let interval = params.blocks_per_halving.max(1);
    let epoch = height / interval;
    let start_block = epoch * interval;
    let end_block = start_block
        .checked_add(interval - 1)
        .ok_or(IssuanceError::CalculationOverflow("halving epoch end block"))?;
    let current_target = target_for_epoch(epoch, params);

    Ok(HalvingState {
        height,
        epoch,
        start_block,
        end_block,
        blocks_elapsed: height - start_block + 1,
        blocks_remaining: end_block - height,
        current_target,
        next_target: current_target as f64 / 2.0,
        next_epoch_target: target_for_epoch(epoch.saturating_add(1), params),
    })
}
