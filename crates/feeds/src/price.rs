use crate::error::FeedError;
use crate::http::Endpoint;
use reqwest::Client;
use serde::Deserialize;

const ETH_USD_PATH: &str = "api/v3/simple/price?ids=ethereum&vs_currencies=usd";

/// Spot-price API client (CoinGecko `simple/price` shape).
#[derive(Debug, Clone)]
pub struct PriceFeedClient {
    endpoint: Endpoint,
}

#[derive(Debug, Deserialize)]
struct SimplePriceView {
    ethereum: Option<UsdQuoteView>,
}

#[derive(Debug, Deserialize)]
struct UsdQuoteView {
    usd: Option<f64>,
}

impl PriceFeedClient {
    pub fn new(base_url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, http)?,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        self.endpoint.base_url()
    }

    pub async fn eth_usd(&self) -> Result<f64, FeedError> {
        let view: SimplePriceView = self.endpoint.get_json(ETH_USD_PATH).await?;
        let usd = view
            .ethereum
            .and_then(|quote| quote.usd)
            .ok_or_else(|| FeedError::parse_error("price feed returned no ETH/USD quote"))?;
        if !usd.is_finite() || usd <= 0.0 {
            return Err(FeedError::parse_error(format!("implausible ETH/USD quote {usd}")));
        }
        Ok(usd)
    }
}
