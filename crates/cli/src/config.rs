use anyhow::{Context, Result};
use config::{Config, File as ConfigFile};
use forecast_feeds::{
    FeedConfig, DEFAULT_EXPLORER_URL, DEFAULT_HISTORY_URL, DEFAULT_L1_RPC_URL, DEFAULT_MINT_CONTRACT,
    DEFAULT_PRICE_URL, DEFAULT_RPC_URL,
};
use forecast_issuance::DEFAULT_HISTORY_LIMIT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "forecast.toml";
const ENV_PREFIX: &str = "FORECAST";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // Sources
    pub explorer_url: String,
    pub rpc_url: String,
    pub l1_rpc_url: Option<String>,
    pub price_url: Option<String>,
    pub history_url: String,
    pub mint_contract: String,
    pub request_timeout_secs: u64,

    // Polling
    pub poll_interval_secs: u64,
    pub history_limit: usize,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            l1_rpc_url: Some(DEFAULT_L1_RPC_URL.to_string()),
            price_url: Some(DEFAULT_PRICE_URL.to_string()),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            mint_contract: DEFAULT_MINT_CONTRACT.to_string(),
            request_timeout_secs: 10,
            poll_interval_secs: 60,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Layer the config file (explicit path, or `forecast.toml` when present)
    /// under `FORECAST_*` environment variables.
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                path.exists().then_some(path)
            }
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config = builder.build().context("failed to read configuration")?;
        let app: AppConfig = config
            .try_deserialize()
            .context("invalid configuration")?;
        if app.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        Ok(app)
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            explorer_url: self.explorer_url.clone(),
            rpc_url: self.rpc_url.clone(),
            l1_rpc_url: self.l1_rpc_url.clone().filter(|url| !url.is_empty()),
            price_url: self.price_url.clone().filter(|url| !url.is_empty()),
            history_url: self.history_url.clone(),
            mint_contract: self.mint_contract.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
