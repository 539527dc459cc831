//! JSON-RPC client for a Sui fullnode.
//!
//! ## Endpoints
//! - Localnet: `http://127.0.0.1:9000`
//! - Devnet: `https://fullnode.devnet.sui.io:443`
//! - Testnet: `https://fullnode.testnet.sui.io:443`
//! - Mainnet: `https://fullnode.mainnet.sui.io:443`
//!
//! ## Usage
//!
//! ```ignore
//! let client = JsonRpcClient::from_env();
//! let obj = client.get_object("0x6")?;
//! let price = client.get_reference_gas_price()?;
//! ```

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

use crate::models::{
    value_to_u64, CoinPage, DevInspectResults, ExecuteTransactionRequestType, SuiObjectResponse,
    TransactionBlockResponse, TransactionBlockResponseOptions,
};
use crate::rpc::SuiRpc;

pub const LOCALNET_URL: &str = "http://127.0.0.1:9000";
pub const DEVNET_URL: &str = "https://fullnode.devnet.sui.io:443";
pub const TESTNET_URL: &str = "https://fullnode.testnet.sui.io:443";
pub const MAINNET_URL: &str = "https://fullnode.mainnet.sui.io:443";

/// JSON-RPC 2.0 client over HTTP.
pub struct JsonRpcClient {
    endpoint: String,
    agent: ureq::Agent,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = std::env::var("SUI_RPC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        let connect_secs = std::env::var("SUI_RPC_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_SECS);
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(connect_secs),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client from `SUI_RPC_URL` (default: localnet).
    pub fn from_env() -> Self {
        let endpoint = std::env::var("SUI_RPC_URL").unwrap_or_else(|_| LOCALNET_URL.to_string());
        Self::new(&endpoint)
    }

    pub fn localnet() -> Self {
        Self::new(LOCALNET_URL)
    }

    pub fn devnet() -> Self {
        Self::new(DEVNET_URL)
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET_URL)
    }

    pub fn mainnet() -> Self {
        Self::new(MAINNET_URL)
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one JSON-RPC call and return its `result`.
    pub fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(method, id, "json-rpc request");

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("{} request failed: {}", method, e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse {} response: {}", method, e))?;

        extract_result(method, response)
    }

    fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let result = self.call(method, params)?;
        serde_json::from_value(result).with_context(|| format!("unexpected {} result shape", method))
    }
}

/// Pull `result` out of a JSON-RPC envelope, turning an `error` object into an error.
pub fn extract_result(method: &str, response: Value) -> Result<Value> {
    if let Some(error) = response.get("error") {
        if !error.is_null() {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(anyhow!("{} returned error {}: {}", method, code, msg));
        }
    }
    response
        .get("result")
        .cloned()
        .ok_or_else(|| anyhow!("No result in {} response", method))
}

impl SuiRpc for JsonRpcClient {
    fn get_object(&self, object_id: &str) -> Result<SuiObjectResponse> {
        debug!(object_id, "sui_getObject");
        self.call_typed(
            "sui_getObject",
            json!([object_id, {"showType": true, "showOwner": true, "showContent": true}]),
        )
    }

    fn get_all_coins(
        &self,
        owner: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<CoinPage> {
        self.call_typed("suix_getAllCoins", json!([owner, cursor, limit]))
    }

    fn get_reference_gas_price(&self) -> Result<u64> {
        let result = self.call("suix_getReferenceGasPrice", json!([]))?;
        value_to_u64(&result).ok_or_else(|| anyhow!("invalid reference gas price: {}", result))
    }

    fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
        options: &TransactionBlockResponseOptions,
        request_type: ExecuteTransactionRequestType,
    ) -> Result<TransactionBlockResponse> {
        self.call_typed(
            "sui_executeTransactionBlock",
            json!([tx_bytes, signatures, options, request_type]),
        )
    }

    fn dev_inspect_transaction_block(
        &self,
        sender: &str,
        tx_kind_bytes: &str,
        gas_price: Option<u64>,
    ) -> Result<DevInspectResults> {
        let gas_price = gas_price.map(|p| p.to_string());
        self.call_typed(
            "sui_devInspectTransactionBlock",
            json!([sender, tx_kind_bytes, gas_price, Value::Null]),
        )
    }
}
