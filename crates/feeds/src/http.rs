use crate::error::FeedError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Build the HTTP client shared by all feeds.
pub fn build_http_client(timeout: Duration) -> Result<Client, FeedError> {
    Ok(Client::builder().timeout(timeout).gzip(true).build()?)
}

/// A base URL plus the client used to reach it.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    base_url: Url,
    http: Client,
}

impl Endpoint {
    /// Treat `base_url` as a directory: relative paths are joined below it.
    pub(crate) fn new(base_url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        let mut url = parse_url(base_url.as_ref())?;
        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_owned();
            path.push('/');
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            http,
        })
    }

    /// Use `url` verbatim, for sources that are a single document.
    pub(crate) fn exact(url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        Ok(Self {
            base_url: parse_url(url.as_ref())?,
            http,
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, FeedError> {
        if path.is_empty() {
            return Ok(self.base_url.clone());
        }
        Ok(self.base_url.join(path)?)
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T, FeedError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Self::map_response(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FeedError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        Self::map_response(response).await
    }

    async fn map_response<T>(response: Response) -> Result<T, FeedError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let text = String::from_utf8_lossy(&bytes).to_string();
            return Err(FeedError::server_error(status.as_u16(), text));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FeedError::parse_error(format!("unexpected response body: {err}")))
    }
}

fn parse_url(raw: &str) -> Result<Url, FeedError> {
    Url::parse(raw).map_err(|_| FeedError::InvalidBaseUrl(raw.to_string()))
}
