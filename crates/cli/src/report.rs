//! JSON reports printed by the CLI.

use forecast_feeds::MarketData;
use forecast_issuance::{
    BlockHeight, Forecast, HalvingState, IssuanceCalculator, IssuanceError, IssuanceInputs,
    IssuanceProgress, MiningCost, MintRateGwei, PeriodHistory, PeriodRecord, PeriodState, Tokens, TotalIssuance,
};
use serde::Serialize;

/// Full view of one refresh. A failed forecast is reported, not fatal.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub inputs: IssuanceInputs,
    pub halving: HalvingState,
    pub halving_progress_percent: f64,
    pub period: PeriodState,
    pub period_progress_percent: f64,
    pub forecast: Option<Forecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<String>,
    pub progress: Option<IssuanceProgress>,
    pub market: MarketData,
    pub mining_cost: Option<MiningCost>,
    pub total_issuance: Option<TotalIssuance>,
}

impl Report {
    pub fn build(
        calculator: &IssuanceCalculator,
        inputs: &IssuanceInputs,
        market: MarketData,
        history: Option<&PeriodHistory>,
    ) -> Result<Self, IssuanceError> {
        let halving = calculator.halving(inputs.height)?;
        let period = calculator.period(inputs.height)?;

        let (forecast, forecast_error) = match calculator.forecast(inputs) {
            Ok(forecast) => (Some(forecast), None),
            Err(err) => (None, Some(err.to_string())),
        };

        let progress = forecast.and_then(|forecast| {
            IssuanceProgress::new(
                halving.current_target,
                inputs.minted_so_far,
                forecast.forecasted_total,
            )
            .ok()
        });

        let mining_cost = match (market.l1_gas_price_gwei, market.eth_usd) {
            (Some(gas), Some(eth_usd)) => MiningCost::new(
                gas,
                eth_usd,
                inputs.current_mint_rate,
                forecast.map(|f| f.forecasted_rate),
            )
            .ok(),
            _ => None,
        };

        let total_issuance = history
            .and_then(|history| TotalIssuance::new(history.total_minted(), inputs.minted_so_far).ok());

        Ok(Self {
            inputs: *inputs,
            halving_progress_percent: halving.progress_percent(),
            halving,
            period_progress_percent: period.progress_percent(),
            period,
            forecast,
            forecast_error,
            progress,
            market,
            mining_cost,
            total_issuance,
        })
    }
}

/// One completed period as listed by `forecast history`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub start_block: BlockHeight,
    pub end_block: BlockHeight,
    pub mint_rate_gwei: MintRateGwei,
    pub minted: Tokens,
    pub target: u64,
    pub heat: f64,
}

impl HistoryRow {
    /// Heat is measured against the target of the epoch the period ended in.
    pub fn new(
        calculator: &IssuanceCalculator,
        record: &PeriodRecord,
    ) -> Result<Self, IssuanceError> {
        let target = calculator.halving(record.block_ending)?.current_target;
        Ok(Self {
            start_block: record.start_block(calculator.params()),
            end_block: record.block_ending,
            mint_rate_gwei: record.mint_rate_gwei(),
            minted: record.minted,
            target,
            heat: record.heat(target),
        })
    }
}
