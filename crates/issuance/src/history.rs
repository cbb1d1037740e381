//! Completed adjustment periods as published in the historical issuance blob.

use crate::errors::{ensure_non_negative, IssuanceError};
use crate::types::{BlockHeight, IssuanceParams, MintRateGwei, Tokens};
use crate::units::WEI_PER_GWEI;
use serde::{Deserialize, Serialize};

/// Number of periods shown by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// One completed adjustment period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(rename = "block-ending")]
    pub block_ending: BlockHeight,
    #[serde(rename = "fctMinted")]
    pub minted: Tokens,
    /// Mint rate in wei per gas unit
    #[serde(rename = "fctMintRate")]
    pub mint_rate_wei: f64,
}

impl PeriodRecord {
    pub fn start_block(&self, params: &IssuanceParams) -> BlockHeight {
        self.block_ending
            .saturating_sub(params.period_length.max(1) - 1)
    }

    pub fn mint_rate_gwei(&self) -> MintRateGwei {
        (self.mint_rate_wei / WEI_PER_GWEI as f64).round().max(0.0) as MintRateGwei
    }

    /// Issuance intensity in `[0, 1]`, saturating at twice the target.
    pub fn heat(&self, target: u64) -> f64 {
        if target == 0 {
            return if self.minted > 0.0 { 1.0 } else { 0.0 };
        }
        (self.minted / (2.0 * target as f64)).clamp(0.0, 1.0)
    }
}

/// Period records ordered by ending block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodHistory {
    records: Vec<PeriodRecord>,
}

impl PeriodHistory {
    pub fn new(mut records: Vec<PeriodRecord>) -> Self {
        records.sort_by_key(|record| record.block_ending);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    /// The `limit` most recent periods, oldest first.
    pub fn recent(&self, limit: usize) -> &[PeriodRecord] {
        let skip = self.records.len().saturating_sub(limit);
        &self.records[skip..]
    }

    pub fn latest(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    pub fn total_minted(&self) -> Tokens {
        self.records.iter().map(|record| record.minted).sum()
    }
}

/// Supply issued since launch: completed periods plus the open period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalIssuance {
    pub past_periods: Tokens,
    pub current_period: Tokens,
    pub total: Tokens,
    pub past_percent: f64,
    pub current_percent: f64,
}

impl TotalIssuance {
    pub fn new(past_periods: Tokens, current_period: Tokens) -> Result<Self, IssuanceError> {
        let past_periods = ensure_non_negative("past_periods", past_periods)?;
        let current_period = ensure_non_negative("current_period", current_period)?;
        let total = past_periods + current_period;
        let share = |part: f64| if total > 0.0 { part / total * 100.0 } else { 0.0 };

        Ok(Self {
            past_periods,
            current_period,
            total,
            past_percent: share(past_periods),
            current_percent: share(current_period),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(block_ending: u64, minted: f64) -> PeriodRecord {
        PeriodRecord {
            block_ending,
            minted,
            mint_rate_wei: 800_000_000_000_000.0,
        }
    }

    #[test]
    fn parses_blob_field_names() {
        let json = r#"[{"block-ending": 19999, "fctMinted": 412345.6, "fctMintRate": 800000000000000}]"#;
        let records: Vec<PeriodRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].block_ending, 19_999);
        assert_eq!(records[0].mint_rate_gwei(), 800_000);
        assert_eq!(records[0].start_block(&IssuanceParams::default()), 10_000);
    }

    #[test]
    fn recent_returns_latest_in_order() {
        let history = PeriodHistory::new(vec![
            record(39_999, 3.0),
            record(9_999, 1.0),
            record(29_999, 2.5),
            record(19_999, 2.0),
        ]);

        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].block_ending, 29_999);
        assert_eq!(recent[1].block_ending, 39_999);
        assert_eq!(history.recent(10).len(), 4);
        assert_eq!(history.latest().unwrap().block_ending, 39_999);
        assert_eq!(history.total_minted(), 8.5);
    }

    #[test]
    fn heat_saturates_at_double_target() {
        assert_eq!(record(9_999, 0.0).heat(400_000), 0.0);
        assert_eq!(record(9_999, 400_000.0).heat(400_000), 0.5);
        assert_eq!(record(9_999, 1_200_000.0).heat(400_000), 1.0);
        assert_eq!(record(9_999, 1.0).heat(0), 1.0);
    }

    #[test]
    fn total_issuance_shares() {
        let total = TotalIssuance::new(300.0, 100.0).unwrap();
        assert_eq!(total.total, 400.0);
        assert_eq!(total.past_percent, 75.0);
        assert_eq!(total.current_percent, 25.0);

        let empty = TotalIssuance::new(0.0, 0.0).unwrap();
        assert_eq!(empty.past_percent, 0.0);
        assert!(TotalIssuance::new(-1.0, 0.0).is_err());
    }
}
