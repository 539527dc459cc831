//! JSON-RPC response models.
//!
//! Only the fields the call encoder reads are modelled; everything else is
//! kept as raw JSON so callers can still inspect it. Fullnodes render u64
//! values as strings in most places and as numbers in a few, so every u64
//! here accepts both.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize a u64 written either as a JSON number or a decimal string.
pub fn u64_from_str_or_num<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_u64(&value).ok_or_else(|| serde::de::Error::custom(format!("expected u64, got {}", value)))
}

fn opt_u64_from_str_or_num<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => value_to_u64(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected u64, got {}", v))),
    }
}

/// Read a u64 out of a JSON number or decimal string.
pub fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Objects
// =============================================================================

/// Owner of an object as reported by `sui_getObject`.
///
/// The fullnode writes owners as `{"AddressOwner": "0x.."}`,
/// `{"ObjectOwner": "0x.."}`, `{"Shared": {"initial_shared_version": n}}` or
/// the bare string `"Immutable"`. This record keeps every key that was present
/// rather than picking one, so classification can apply its own precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnerRecord {
    pub address_owner: Option<String>,
    pub object_owner: Option<String>,
    pub initial_shared_version: Option<u64>,
    pub shared: bool,
    pub immutable: bool,
}

impl<'de> Deserialize<'de> for OwnerRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(OwnerRecord::from_value(&value))
    }
}

impl OwnerRecord {
    pub fn from_value(value: &Value) -> Self {
        let mut record = OwnerRecord::default();
        match value {
            Value::String(s) if s == "Immutable" => record.immutable = true,
            Value::Object(map) => {
                record.address_owner = map
                    .get("AddressOwner")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                record.object_owner = map
                    .get("ObjectOwner")
                    .and_then(|v| v.as_str())
                    .map(String::from);
                if let Some(shared) = map.get("Shared") {
                    record.shared = true;
                    record.initial_shared_version =
                        shared.get("initial_shared_version").and_then(value_to_u64);
                }
                if let Some(consensus) = map.get("ConsensusAddressOwner") {
                    record.address_owner = consensus
                        .get("owner")
                        .and_then(|v| v.as_str())
                        .map(String::from);
                }
            }
            _ => {}
        }
        record
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    pub object_id: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub version: u64,
    pub digest: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerRecord>,
    /// Parsed Move content (`{"dataType": "moveObject", "fields": {...}}`).
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiObjectResponse {
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

// =============================================================================
// Coins
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_type: String,
    pub coin_object_id: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub version: u64,
    pub digest: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub balance: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecuteTransactionRequestType {
    WaitForEffectsCert,
    WaitForLocalExecution,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponseOptions {
    pub show_input: bool,
    pub show_raw_input: bool,
    pub show_effects: bool,
    pub show_events: bool,
    pub show_object_changes: bool,
    pub show_balance_changes: bool,
}

impl TransactionBlockResponseOptions {
    /// Input, raw input, effects, object changes and balance changes.
    pub fn full_content() -> Self {
        Self {
            show_input: true,
            show_raw_input: true,
            show_effects: true,
            show_events: false,
            show_object_changes: true,
            show_balance_changes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_failure(&self) -> bool {
        self.status == "failure"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub computation_cost: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub storage_cost: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub storage_rebate: u64,
    #[serde(default, deserialize_with = "opt_u64_from_str_or_num")]
    pub non_refundable_storage_fee: Option<u64>,
}

impl GasCostSummary {
    /// Net gas charged: computation + storage - rebate.
    ///
    /// Widened to `i128` so no combination of `u64` costs can overflow.
    pub fn net_gas_usage(&self) -> i128 {
        i128::from(self.computation_cost) + i128::from(self.storage_cost)
            - i128::from(self.storage_rebate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub gas_used: Option<GasCostSummary>,
    #[serde(default)]
    pub created: Vec<Value>,
    #[serde(default)]
    pub mutated: Vec<Value>,
    #[serde(default)]
    pub transaction_digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    #[serde(default)]
    pub object_changes: Option<Vec<Value>>,
    #[serde(default)]
    pub balance_changes: Option<Vec<Value>>,
    #[serde(default)]
    pub raw_transaction: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Result of `sui_devInspectTransactionBlock`.
///
/// `results` stays raw JSON: one record per command, each with
/// `returnValues: [[[bytes...], "type"], ...]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevInspectResults {
    pub effects: TransactionEffects,
    #[serde(default)]
    pub results: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub events: Vec<Value>,
}
