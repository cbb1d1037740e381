//! Upstream data sources for the issuance forecast.
//!
//! Each source is a thin typed client over HTTP. [`FeedSet`] groups them and
//! produces the calculator's inputs: either a complete, consistent set of
//! inputs or an error, never partial data.

mod contract;
mod error;
mod explorer;
mod history;
mod http;
mod price;
mod rpc;

pub use crate::contract::{
    ContractIssuance, MintContract, DEFAULT_MINT_CONTRACT, MINT_RATE_SIG, PERIOD_L1_DATA_GAS_SIG,
};
pub use crate::error::FeedError;
pub use crate::explorer::ExplorerClient;
pub use crate::history::HistoryClient;
pub use crate::http::build_http_client;
pub use crate::price::PriceFeedClient;
pub use crate::rpc::{decode_u128, encode_call, selector, RpcClient};

use forecast_issuance::{IssuanceInputs, PeriodHistory};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.facet.org/";
pub const DEFAULT_RPC_URL: &str = "https://mainnet.facet.org/";
pub const DEFAULT_L1_RPC_URL: &str = "https://ethereum-rpc.publicnode.com/";
pub const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/";
pub const DEFAULT_HISTORY_URL: &str =
    "https://ittybits.blob.core.windows.net/ittybits-assets/adjustment_periods.json.gz";

/// Where each source lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub explorer_url: String,
    pub rpc_url: String,
    pub l1_rpc_url: Option<String>,
    pub price_url: Option<String>,
    pub history_url: String,
    pub mint_contract: String,
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            l1_rpc_url: Some(DEFAULT_L1_RPC_URL.to_string()),
            price_url: Some(DEFAULT_PRICE_URL.to_string()),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            mint_contract: DEFAULT_MINT_CONTRACT.to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// L1 market conditions; each value is absent when its source failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub l1_gas_price_gwei: Option<f64>,
    pub eth_usd: Option<f64>,
}

/// All configured sources.
#[derive(Debug, Clone)]
pub struct FeedSet {
    explorer: ExplorerClient,
    contract: MintContract,
    l1_rpc: Option<RpcClient>,
    price: Option<PriceFeedClient>,
    history: HistoryClient,
}

impl FeedSet {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http = build_http_client(Duration::from_secs(config.request_timeout_secs.max(1)))?;

        let l1_rpc = config
            .l1_rpc_url
            .as_deref()
            .map(|url| RpcClient::new(url, http.clone()))
            .transpose()?;
        let price = config
            .price_url
            .as_deref()
            .map(|url| PriceFeedClient::new(url, http.clone()))
            .transpose()?;

        let explorer = ExplorerClient::new(&config.explorer_url, http.clone())?;
        let rpc = RpcClient::new(&config.rpc_url, http.clone())?;
        let history = HistoryClient::new(&config.history_url, http)?;

        debug!(
            explorer = %explorer.base_url(),
            rpc = %rpc.base_url(),
            l1_rpc = ?l1_rpc.as_ref().map(|rpc| rpc.base_url().as_str()),
            price = ?price.as_ref().map(|feed| feed.base_url().as_str()),
            history = %history.url(),
            contract = %config.mint_contract,
            "configured data sources"
        );

        Ok(Self {
            explorer,
            contract: MintContract::new(rpc, config.mint_contract.clone()),
            l1_rpc,
            price,
            history,
        })
    }

    pub fn explorer(&self) -> &ExplorerClient {
        &self.explorer
    }

    pub fn contract(&self) -> &MintContract {
        &self.contract
    }

    /// Chain height and mint state, fetched together.
    pub async fn collect_inputs(&self) -> Result<IssuanceInputs, FeedError> {
        let (height, issuance) =
            tokio::try_join!(self.explorer.latest_height(), self.contract.read_issuance())?;
        debug!(height, rate = issuance.current_mint_rate, "collected issuance inputs");
        Ok(IssuanceInputs::new(
            height,
            issuance.current_mint_rate,
            issuance.minted_so_far,
        ))
    }

    /// Best-effort L1 gas price and ETH price.
    pub async fn collect_market(&self) -> MarketData {
        let gas = async {
            match &self.l1_rpc {
                Some(rpc) => Some(rpc.gas_price_gwei().await),
                None => None,
            }
        };
        let price = async {
            match &self.price {
                Some(feed) => Some(feed.eth_usd().await),
                None => None,
            }
        };
        let (gas, price) = tokio::join!(gas, price);

        MarketData {
            l1_gas_price_gwei: gas.and_then(|res| {
                res.map_err(|err| warn!("L1 gas price unavailable: {err}"))
                    .ok()
            }),
            eth_usd: price.and_then(|res| {
                res.map_err(|err| warn!("ETH price unavailable: {err}"))
                    .ok()
            }),
        }
    }

    pub async fn fetch_history(&self) -> Result<PeriodHistory, FeedError> {
        self.history.fetch().await
    }
}
