use crate::errors::{ensure_non_negative, IssuanceError};
use crate::types::{IssuanceParams, MintRateGwei, Tokens, MIN_RATE};
use serde::{Deserialize, Serialize};

/// Projected issuance and mint rate for the next adjustment period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current_mint_rate: MintRateGwei,
    /// Current-period issuance extrapolated linearly to a full period
    pub forecasted_total: u64,
    /// Rate that would bring issuance back to target, before bounds
    pub raw_forecasted_rate: u64,
    pub forecasted_rate: MintRateGwei,
    /// Relative change from the current rate, in percent
    pub change_percent: f64,
}

impl Forecast {
    pub fn is_increase(&self) -> bool {
        self.change_percent >= 0.0
    }
}

/// Round half away from zero into an integer, refusing values that do not fit.
fn round_to_u64(value: f64, what: &'static str) -> Result<u64, IssuanceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(IssuanceError::CalculationOverflow(what));
    }
    let rounded = value.round();
    if rounded >= u64::MAX as f64 {
        return Err(IssuanceError::CalculationOverflow(what));
    }
    Ok(rounded as u64)
}

/// Bounds applied to a forecasted rate: half the current rate (at least
/// [`MIN_RATE`]) up to double the current rate (at most the absolute maximum).
pub fn rate_bounds(
    current_mint_rate: MintRateGwei,
    params: &IssuanceParams,
) -> Result<(MintRateGwei, MintRateGwei), IssuanceError> {
    if current_mint_rate == 0 {
        return Err(IssuanceError::RateUnavailable);
    }
    let lower = round_to_u64(current_mint_rate as f64 * 0.5, "rate lower bound")?.max(MIN_RATE);
    let upper = params
        .absolute_max_rate
        .min(current_mint_rate.saturating_mul(2));
    Ok((lower, upper))
}

/// Forecast the next-period mint rate from issuance observed so far.
///
/// `target` is the per-period issuance target of the current halving epoch.
/// The lower bound is applied before the upper bound, so when the current
/// rate already exceeds the absolute maximum the ceiling wins.
pub fn compute_forecast(
    current_mint_rate: MintRateGwei,
    minted_so_far: Tokens,
    blocks_elapsed: u64,
    target: u64,
    params: &IssuanceParams,
) -> Result<Forecast, IssuanceError> {
    if current_mint_rate == 0 {
        return Err(IssuanceError::RateUnavailable);
    }
    let minted = ensure_non_negative("minted_so_far", minted_so_far)?;

    let length = params.period_length.max(1);
    if blocks_elapsed == 0 || blocks_elapsed > length {
        return Err(IssuanceError::invalid_input(format!(
            "blocks_elapsed must be within 1..={length}, got {blocks_elapsed}"
        )));
    }

    let forecasted_total = round_to_u64(
        minted / blocks_elapsed as f64 * length as f64,
        "forecasted_total",
    )?;
    if forecasted_total == 0 {
        return Err(IssuanceError::ForecastUndefined);
    }

    let rate = current_mint_rate as f64;
    let raw_forecasted_rate = round_to_u64(
        rate * (target as f64 / forecasted_total as f64),
        "raw_forecasted_rate",
    )?;

    let (lower, upper) = rate_bounds(current_mint_rate, params)?;
    let forecasted_rate = raw_forecasted_rate.max(lower).min(upper);
    let change_percent = (forecasted_rate as f64 - rate) / rate * 100.0;

    Ok(Forecast {
        current_mint_rate,
        forecasted_total,
        raw_forecasted_rate,
        forecasted_rate,
        change_percent,
    })
}

/// Issued and forecasted issuance relative to the period target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssuanceProgress {
    pub target: u64,
    pub issued: Tokens,
    pub forecasted: u64,
    pub issued_vs_target_percent: f64,
    pub forecasted_vs_target_percent: f64,
}

impl IssuanceProgress {
    pub fn new(target: u64, issued: Tokens, forecasted: u64) -> Result<Self, IssuanceError> {
        let issued = ensure_non_negative("issued", issued)?;
        if target == 0 {
            return Err(IssuanceError::invalid_input("issuance target is zero"));
        }
        let target_f = target as f64;
        Ok(Self {
            target,
            issued,
            forecasted,
            issued_vs_target_percent: issued / target_f * 100.0,
            forecasted_vs_target_percent: forecasted as f64 / target_f * 100.0,
        })
    }
}
