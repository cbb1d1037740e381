//! Minimal JSON-RPC 2.0 client for read-only EVM calls.

use crate::error::FeedError;
use crate::http::Endpoint;
use forecast_issuance::wei_to_gwei;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: Endpoint,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorView>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorView {
    code: i64,
    message: String,
}

/// 4-byte function selector: the first four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Calldata for a no-argument function call.
pub fn encode_call(signature: &str) -> String {
    format!("0x{}", hex::encode(selector(signature)))
}

/// Decode a hex quantity or a 32-byte ABI word into `u128`.
pub fn decode_u128(raw: &str) -> Result<u128, FeedError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| FeedError::parse_error(format!("missing 0x prefix in {raw:?}")))?;
    if digits.is_empty() {
        return Err(FeedError::parse_error("empty hex value"));
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(FeedError::parse_error(format!("value {raw} exceeds u128")));
    }
    u128::from_str_radix(significant, 16)
        .map_err(|err| FeedError::parse_error(format!("invalid hex value {raw:?}: {err}")))
}

impl RpcClient {
    pub fn new(url: impl AsRef<str>, http: Client) -> Result<Self, FeedError> {
        Ok(Self {
            endpoint: Endpoint::new(url, http)?,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn base_url(&self) -> &url::Url {
        self.endpoint.base_url()
    }

    /// Issue a JSON-RPC request and return its `result`.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, FeedError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "json-rpc request");
        let response: RpcResponse = self.endpoint.post_json("", &request).await?;

        if let Some(error) = response.error {
            return Err(FeedError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| FeedError::parse_error(format!("{method} returned no result")))
    }

    /// `eth_call` against the latest block, returning the raw hex result.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String, FeedError> {
        let result = self
            .request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await?;
        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| FeedError::parse_error("eth_call result is not a string"))
    }

    /// Call a no-argument view function returning a `uint256` that fits in `u128`.
    pub async fn call_u128(&self, to: &str, signature: &str) -> Result<u128, FeedError> {
        let raw = self.eth_call(to, &encode_call(signature)).await?;
        decode_u128(&raw)
    }

    /// Current gas price in gwei.
    pub async fn gas_price_gwei(&self) -> Result<f64, FeedError> {
        let result = self.request("eth_gasPrice", json!([])).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| FeedError::parse_error("eth_gasPrice result is not a string"))?;
        Ok(wei_to_gwei(decode_u128(raw)?))
    }
}
