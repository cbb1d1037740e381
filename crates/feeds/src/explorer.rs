use crate::error::FeedError;
use crate::http::Endpoint;
use forecast_issuance::{validate_height, BlockHeight};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const LATEST_BLOCKS_PATH: &str = "api/v2/main-page/blocks";

/// Block-explorer API client used for the current chain height.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    endpoint: Endpoint,
}

#[derive(Debug, Deserialize)]
struct BlockView {
    height: HeightView,
}

/// Explorers disagree on whether heights are numbers or decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HeightView {
    Number(i64),
    Text(String),
}

impl ExplorerClient {
    pub fn new(base_url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, http)?,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        self.endpoint.base_url()
    }

    /// Height of the most recent block listed on the explorer's main page.
    pub async fn latest_height(&self) -> Result<BlockHeight, FeedError> {
        let blocks: Vec<BlockView> = self.endpoint.get_json(LATEST_BLOCKS_PATH).await?;
        let first = blocks
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::parse_error("explorer returned no blocks"))?;

        let raw = match first.height {
            HeightView::Number(n) => n,
            HeightView::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| FeedError::parse_error(format!("invalid block height {s:?}")))?,
        };
        let height =
            validate_height(raw).map_err(|err| FeedError::parse_error(err.to_string()))?;
        debug!(height, "latest block height");
        Ok(height)
    }
}
