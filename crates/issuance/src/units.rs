//! Conversions between the on-chain integer denominations and the units the
//! calculator works in.

use crate::errors::IssuanceError;
use crate::types::{MintRateGwei, Tokens};

pub const WEI_PER_GWEI: u128 = 1_000_000_000;
pub const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Convert an on-chain mint rate (wei per gas unit) to whole gwei, rounding
/// to the nearest gwei.
pub fn mint_rate_gwei(rate_wei: u128) -> Result<MintRateGwei, IssuanceError> {
    let gwei = rate_wei / WEI_PER_GWEI + u128::from(rate_wei % WEI_PER_GWEI >= WEI_PER_GWEI / 2);
    MintRateGwei::try_from(gwei).map_err(|_| IssuanceError::CalculationOverflow("mint rate in gwei"))
}

/// Tokens minted so far in the open period: the period's cumulative L1 data
/// gas times the per-gas mint rate, rounded to whole tokens.
pub fn minted_tokens(period_l1_data_gas: u128, rate_wei: u128) -> Result<Tokens, IssuanceError> {
    let minted_wei = period_l1_data_gas
        .checked_mul(rate_wei)
        .ok_or(IssuanceError::CalculationOverflow("period issuance in wei"))?;
    let whole = minted_wei / WEI_PER_TOKEN;
    let rem = minted_wei % WEI_PER_TOKEN;
    let rounded = whole + u128::from(rem >= WEI_PER_TOKEN / 2);
    Ok(rounded as f64)
}

/// Convert a wei amount (e.g. a gas price) to fractional gwei.
pub fn wei_to_gwei(wei: u128) -> f64 {
    wei as f64 / WEI_PER_GWEI as f64
}
