use crate::errors::{ensure_non_negative, IssuanceError};
use crate::types::MintRateGwei;
use serde::{Deserialize, Serialize};

/// USD cost of minting one token by burning L1 calldata gas.
///
/// Each gas unit costs `gas_price_gwei` gwei of ETH and mints
/// `mint_rate_gwei` gwei of token, so the gwei factors cancel.
pub fn mining_cost_usd(
    gas_price_gwei: f64,
    mint_rate_gwei: MintRateGwei,
    eth_usd: f64,
) -> Result<f64, IssuanceError> {
    let gas_price = ensure_non_negative("gas_price_gwei", gas_price_gwei)?;
    let eth_usd = ensure_non_negative("eth_usd", eth_usd)?;
    if mint_rate_gwei == 0 {
        return Err(IssuanceError::RateUnavailable);
    }
    let eth_per_token = gas_price / mint_rate_gwei as f64;
    Ok(eth_per_token * eth_usd)
}

/// Mining cost at the current and the forecasted rate for one gas price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningCost {
    pub gas_price_gwei: f64,
    pub eth_usd: f64,
    pub current_usd: f64,
    pub forecasted_usd: Option<f64>,
}

impl MiningCost {
    pub fn new(
        gas_price_gwei: f64,
        eth_usd: f64,
        current_rate: MintRateGwei,
        forecasted_rate: Option<MintRateGwei>,
    ) -> Result<Self, IssuanceError> {
        let current_usd = mining_cost_usd(gas_price_gwei, current_rate, eth_usd)?;
        let forecasted_usd = forecasted_rate
            .map(|rate| mining_cost_usd(gas_price_gwei, rate, eth_usd))
            .transpose()?;
        Ok(Self {
            gas_price_gwei,
            eth_usd,
            current_usd,
            forecasted_usd,
        })
    }
}
