use crate::errors::{ensure_non_negative, IssuanceError};
use crate::forecast::{compute_forecast, Forecast};
use crate::halving::{compute_halving_state, HalvingState};
use crate::period::{compute_period_state, PeriodState};
use crate::types::{BlockHeight, IssuanceParams, MintRateGwei, Tokens};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chain observations taken at approximately the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssuanceInputs {
    pub height: BlockHeight,
    pub current_mint_rate: MintRateGwei,
    /// Tokens minted so far in the open adjustment period
    pub minted_so_far: Tokens,
}

impl IssuanceInputs {
    pub fn new(height: BlockHeight, current_mint_rate: MintRateGwei, minted_so_far: Tokens) -> Self {
        Self {
            height,
            current_mint_rate,
            minted_so_far,
        }
    }

    pub fn validate(&self) -> Result<(), IssuanceError> {
        ensure_non_negative("minted_so_far", self.minted_so_far)?;
        Ok(())
    }
}

/// Everything derived from one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssuanceSnapshot {
    pub inputs: IssuanceInputs,
    pub halving: HalvingState,
    pub period: PeriodState,
    pub forecast: Forecast,
}

/// Stateless calculator bound to a parameter set.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuanceCalculator {
    params: IssuanceParams,
}

impl IssuanceCalculator {
    pub fn new(params: IssuanceParams) -> Result<Self, IssuanceError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IssuanceParams {
        &self.params
    }

    pub fn halving(&self, height: BlockHeight) -> Result<HalvingState, IssuanceError> {
        compute_halving_state(height, &self.params)
    }

    pub fn period(&self, height: BlockHeight) -> Result<PeriodState, IssuanceError> {
        compute_period_state(height, &self.params)
    }

    /// Forecast the next-period rate against the current epoch's target.
    pub fn forecast(&self, inputs: &IssuanceInputs) -> Result<Forecast, IssuanceError> {
        inputs.validate()?;
        let halving = self.halving(inputs.height)?;
        let period = self.period(inputs.height)?;
        compute_forecast(
            inputs.current_mint_rate,
            inputs.minted_so_far,
            period.blocks_elapsed,
            halving.current_target,
            &self.params,
        )
    }

    /// Derive the halving, period and forecast state in one pass.
    pub fn snapshot(&self, inputs: &IssuanceInputs) -> Result<IssuanceSnapshot, IssuanceError> {
        let forecast = self.forecast(inputs)?;
        let snapshot = IssuanceSnapshot {
            inputs: *inputs,
            halving: self.halving(inputs.height)?,
            period: self.period(inputs.height)?,
            forecast,
        };
        debug!(
            height = inputs.height,
            epoch = snapshot.halving.epoch,
            period = snapshot.period.period_index,
            forecasted_rate = forecast.forecasted_rate,
            "computed issuance snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_epoch_target() {
        let calc = IssuanceCalculator::default();
        // Block 4,999 of an epoch-1 period: target is 200,000
        let inputs = IssuanceInputs::new(2_634_999, 1_000, 100_000.0);
        let snapshot = calc.snapshot(&inputs).unwrap();

        assert_eq!(snapshot.halving.epoch, 1);
        assert_eq!(snapshot.period.blocks_elapsed, 5_000);
        assert_eq!(snapshot.forecast.forecasted_total, 200_000);
        assert_eq!(snapshot.forecast.forecasted_rate, 1_000);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut params = IssuanceParams::default();
        params.period_length = 0;
        assert!(IssuanceCalculator::new(params).is_err());
    }

    #[test]
    fn height_past_the_last_full_epoch_is_an_error() {
        let calc = IssuanceCalculator::default();
        let inputs = IssuanceInputs::new(u64::MAX, 1_000, 10.0);
        assert!(matches!(
            calc.snapshot(&inputs),
            Err(IssuanceError::CalculationOverflow(_))
        ));
    }

    #[test]
    fn negative_minted_is_invalid() {
        let calc = IssuanceCalculator::default();
        let inputs = IssuanceInputs::new(10, 1_000, -5.0);
        assert!(matches!(
            calc.snapshot(&inputs),
            Err(IssuanceError::InvalidInput(_))
        ));
    }
}
