use crate::error::FeedError;
use crate::rpc::RpcClient;
use forecast_issuance::{mint_rate_gwei, minted_tokens, MintRateGwei, Tokens};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Predeployed L2 contract holding the mint state.
pub const DEFAULT_MINT_CONTRACT: &str = "0x4200000000000000000000000000000000000015";

pub const MINT_RATE_SIG: &str = "fctMintRate()";
pub const PERIOD_L1_DATA_GAS_SIG: &str = "fctMintPeriodL1DataGas()";

/// Mint state read from the contract, in raw and calculator units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractIssuance {
    pub mint_rate_wei: u128,
    pub period_l1_data_gas: u128,
    pub current_mint_rate: MintRateGwei,
    pub minted_so_far: Tokens,
}

impl ContractIssuance {
    pub fn from_raw(mint_rate_wei: u128, period_l1_data_gas: u128) -> Result<Self, FeedError> {
        let current_mint_rate =
            mint_rate_gwei(mint_rate_wei).map_err(|err| FeedError::parse_error(err.to_string()))?;
        let minted_so_far = minted_tokens(period_l1_data_gas, mint_rate_wei)
            .map_err(|err| FeedError::parse_error(err.to_string()))?;
        Ok(Self {
            mint_rate_wei,
            period_l1_data_gas,
            current_mint_rate,
            minted_so_far,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MintContract {
    rpc: RpcClient,
    address: String,
}

impl MintContract {
    pub fn new(rpc: RpcClient, address: impl Into<String>) -> Self {
        Self {
            rpc,
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn mint_rate_wei(&self) -> Result<u128, FeedError> {
        self.rpc.call_u128(&self.address, MINT_RATE_SIG).await
    }

    pub async fn period_l1_data_gas(&self) -> Result<u128, FeedError> {
        self.rpc.call_u128(&self.address, PERIOD_L1_DATA_GAS_SIG).await
    }

    /// Read both values concurrently and convert them.
    pub async fn read_issuance(&self) -> Result<ContractIssuance, FeedError> {
        let (gas, rate) = tokio::try_join!(self.period_l1_data_gas(), self.mint_rate_wei())?;
        let issuance = ContractIssuance::from_raw(rate, gas)?;
        debug!(
            rate_gwei = issuance.current_mint_rate,
            minted = issuance.minted_so_far,
            "read mint contract"
        );
        Ok(issuance)
    }
}
