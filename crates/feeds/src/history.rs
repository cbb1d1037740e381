use crate::error::FeedError;
use crate::http::Endpoint;
use forecast_issuance::{PeriodHistory, PeriodRecord};
use reqwest::Client;
use tracing::debug;

/// Client for the static (gzip-encoded) JSON blob of completed periods.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    endpoint: Endpoint,
}

impl HistoryClient {
    pub fn new(blob_url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        Ok(Self {
            endpoint: Endpoint::exact(blob_url, http)?,
        })
    }

    pub fn url(&self) -> &url::Url {
        self.endpoint.base_url()
    }

    pub async fn fetch(&self) -> Result<PeriodHistory, FeedError> {
        let records: Vec<PeriodRecord> = self.endpoint.get_json("").await?;
        debug!(periods = records.len(), "fetched period history");
        Ok(PeriodHistory::new(records))
    }
}
