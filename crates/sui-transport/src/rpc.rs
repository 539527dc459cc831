//! The fullnode operations the call encoder depends on.

use anyhow::Result;

use crate::models::{
    CoinPage, DevInspectResults, ExecuteTransactionRequestType, SuiObjectResponse,
    TransactionBlockResponse, TransactionBlockResponseOptions,
};

/// Blocking access to a Sui fullnode.
///
/// [`crate::JsonRpcClient`] talks to a real node; tests substitute an
/// in-memory chain.
pub trait SuiRpc: Send + Sync {
    /// `sui_getObject` with type, owner and content requested.
    fn get_object(&self, object_id: &str) -> Result<SuiObjectResponse>;

    /// `suix_getAllCoins`: one page of every coin owned by `owner`.
    fn get_all_coins(
        &self,
        owner: &str,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> Result<CoinPage>;

    /// `suix_getReferenceGasPrice`.
    fn get_reference_gas_price(&self) -> Result<u64>;

    /// `sui_executeTransactionBlock` with base64 transaction bytes.
    fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
        options: &TransactionBlockResponseOptions,
        request_type: ExecuteTransactionRequestType,
    ) -> Result<TransactionBlockResponse>;

    /// `sui_devInspectTransactionBlock` with base64 transaction-kind bytes.
    fn dev_inspect_transaction_block(
        &self,
        sender: &str,
        tx_kind_bytes: &str,
        gas_price: Option<u64>,
    ) -> Result<DevInspectResults>;
}
