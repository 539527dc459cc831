//! Sui Transport Layer
//!
//! Blocking fullnode access for the call encoder.
//!
//! This crate provides:
//! - [`rpc`]: the [`SuiRpc`] trait the encoder is written against
//! - [`jsonrpc`]: [`JsonRpcClient`], a JSON-RPC 2.0 implementation over HTTP
//! - [`models`]: response shapes (objects, coins, effects, dev-inspect results)
//!
//! # Example
//!
//! ```ignore
//! use sui_transport::{JsonRpcClient, SuiRpc};
//!
//! // SUI_RPC_URL, SUI_RPC_TIMEOUT_SECS, SUI_RPC_CONNECT_TIMEOUT_SECS
//! let client = JsonRpcClient::from_env();
//! let counter = client.get_object("0x...")?;
//! ```

pub mod jsonrpc;
pub mod models;
pub mod rpc;

// Re-export main types for convenience
pub use jsonrpc::JsonRpcClient;
pub use models::{
    Coin, CoinPage, DevInspectResults, ExecuteTransactionRequestType, ExecutionStatus,
    GasCostSummary, OwnerRecord, SuiObjectData, SuiObjectResponse, TransactionBlockResponse,
    TransactionBlockResponseOptions, TransactionEffects,
};
pub use rpc::SuiRpc;
