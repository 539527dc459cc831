//! Turning an assembled transaction into a submission or a simulation.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use sui_bind_types::encoding::{base64_encode, normalize_address, parse_address};
use sui_bind_types::{Command, ProgrammableTransaction, TransactionData, TransactionKind};
use sui_transport::{
    DevInspectResults, ExecuteTransactionRequestType, SuiRpc, TransactionBlockResponse,
    TransactionBlockResponseOptions, TransactionEffects,
};
use tracing::{debug, info, warn};

use crate::gas::{resolve_gas_payment, resolve_gas_price, TxOpts};
use crate::object_resolver::ObjectResolver;
use crate::signer::Signer;

/// Options shared by every call that touches the chain.
#[derive(Clone)]
pub struct CallOpts {
    pub signer: Arc<dyn Signer>,
    /// Reused between calls to share the object cache; a fresh resolver is
    /// created per call when unset.
    pub object_resolver: Option<Arc<ObjectResolver>>,
    pub tx_opts: TxOpts,
    /// Wait for local execution instead of just the effects certificate.
    pub wait_for_execution: bool,
}

impl CallOpts {
    pub fn new(signer: Arc<dyn Signer>) -> Self {
        Self {
            signer,
            object_resolver: None,
            tx_opts: TxOpts::default(),
            wait_for_execution: true,
        }
    }

    pub fn with_object_resolver(mut self, resolver: Arc<ObjectResolver>) -> Self {
        self.object_resolver = Some(resolver);
        self
    }

    pub fn with_tx_opts(mut self, tx_opts: TxOpts) -> Self {
        self.tx_opts = tx_opts;
        self
    }

    /// Normalized address of the signer.
    pub fn sender(&self) -> Result<String> {
        let address = self
            .signer
            .address()
            .context("failed to get signer address")?;
        normalize_address(&address).map_err(|e| anyhow!("invalid signer address {}: {}", address, e))
    }

    pub(crate) fn resolver(&self, client: &Arc<dyn SuiRpc>) -> Arc<ObjectResolver> {
        self.object_resolver
            .clone()
            .unwrap_or_else(|| Arc::new(ObjectResolver::new(client.clone())))
    }

    fn request_type(&self) -> ExecuteTransactionRequestType {
        if self.wait_for_execution {
            ExecuteTransactionRequestType::WaitForLocalExecution
        } else {
            ExecuteTransactionRequestType::WaitForEffectsCert
        }
    }
}

impl std::fmt::Debug for CallOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallOpts")
            .field("object_resolver", &self.object_resolver)
            .field("tx_opts", &self.tx_opts)
            .field("wait_for_execution", &self.wait_for_execution)
            .finish_non_exhaustive()
    }
}

/// `package::module::function` of every move call, comma separated.
pub fn describe_calls(pt: &ProgrammableTransaction) -> String {
    let calls: Vec<String> = pt
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::MoveCall(call) => Some(call.to_string()),
            _ => None,
        })
        .collect();
    if calls.is_empty() {
        "programmable transaction".to_string()
    } else {
        calls.join(", ")
    }
}

/// Full transaction data with gas payment, budget and price filled in.
pub fn build_transaction_data(
    client: &dyn SuiRpc,
    pt: ProgrammableTransaction,
    sender: &str,
    opts: &TxOpts,
) -> Result<TransactionData> {
    pt.check_inputs_resolved()?;
    let sender_address = parse_address(sender, "sender")?;
    let payment = resolve_gas_payment(client, opts, sender).context("failed to get gas object")?;
    let gas_price = resolve_gas_price(client, opts)?;
    let gas_budget = opts.gas_budget();
    debug!(sender, gas_budget, gas_price, "built transaction data");
    Ok(TransactionData::new_programmable(
        sender_address,
        vec![payment],
        pt,
        gas_budget,
        gas_price,
    ))
}

/// BCS of the transaction kind alone, as dev-inspect expects.
pub fn transaction_kind_bytes(pt: &ProgrammableTransaction) -> Result<Vec<u8>> {
    pt.check_inputs_resolved()?;
    bcs::to_bytes(&TransactionKind::ProgrammableTransaction(pt.clone()))
        .context("failed to serialize transaction kind")
}

/// Sign `tx_bytes` and submit them.
pub fn sign_and_send(
    client: &dyn SuiRpc,
    signer: &dyn Signer,
    tx_bytes: &[u8],
    request_type: ExecuteTransactionRequestType,
) -> Result<TransactionBlockResponse> {
    let signatures = signer.sign(tx_bytes).context("failed to sign transaction")?;
    client
        .execute_transaction_block(
            &base64_encode(tx_bytes),
            &signatures,
            &TransactionBlockResponseOptions::full_content(),
            request_type,
        )
        .context("tx failed calling move method")
}

fn failure_reason(effects: &TransactionEffects) -> Option<&str> {
    effects
        .status
        .is_failure()
        .then(|| effects.status.error.as_deref().unwrap_or("unknown error"))
}

/// The chain's error for a failed transaction, if it failed.
pub fn failed_tx_error(response: &TransactionBlockResponse) -> Option<anyhow::Error> {
    let reason = response.effects.as_ref().and_then(failure_reason)?;
    Some(anyhow!("transaction failed with error: {}", reason))
}

/// Sign and submit a programmable transaction as the signer of `opts`.
pub fn execute_ptb(
    client: &dyn SuiRpc,
    opts: &CallOpts,
    pt: ProgrammableTransaction,
) -> Result<TransactionBlockResponse> {
    let sender = opts.sender()?;
    let description = describe_calls(&pt);
    let data = build_transaction_data(client, pt, &sender, &opts.tx_opts)?;
    let tx_bytes = data.to_bcs_bytes()?;

    let response = sign_and_send(client, opts.signer.as_ref(), &tx_bytes, opts.request_type())
        .with_context(|| format!("executing {}", description))?;

    if let Some(reason) = response.effects.as_ref().and_then(failure_reason) {
        warn!(digest = %response.digest, calls = %description, reason, "transaction failed");
        bail!("transaction failed with error: {} (executing {})", reason, description);
    }
    info!(digest = %response.digest, calls = %description, "transaction executed");
    Ok(response)
}

/// Simulate a programmable transaction without committing it.
pub fn dev_inspect_ptb(
    client: &dyn SuiRpc,
    sender: &str,
    pt: &ProgrammableTransaction,
    gas_price: Option<u64>,
) -> Result<DevInspectResults> {
    let sender = normalize_address(sender).map_err(|e| anyhow!("invalid sender {}: {}", sender, e))?;
    let description = describe_calls(pt);
    let kind_bytes = transaction_kind_bytes(pt)?;

    let results = client
        .dev_inspect_transaction_block(&sender, &base64_encode(&kind_bytes), gas_price)
        .with_context(|| format!("dev inspect of {}", description))?;

    if let Some(reason) = failure_reason(&results.effects) {
        bail!("dev inspect failed for {} with error: {}", description, reason);
    }
    if let Some(error) = &results.error {
        return Err(anyhow!("dev inspect failed for {}: {}", description, error));
    }
    debug!(calls = %description, "dev inspect succeeded");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use move_core_types::identifier::Identifier;
    use sui_bind_types::{Argument, CallArg, ProgrammableMoveCall};

    fn response(status: serde_json::Value) -> TransactionBlockResponse {
        serde_json::from_value(json!({
            "digest": "D1",
            "effects": { "status": status }
        }))
        .unwrap()
    }

    #[test]
    fn test_failed_tx_error() {
        assert!(failed_tx_error(&response(json!({"status": "success"}))).is_none());
        let err = failed_tx_error(&response(json!({
            "status": "failure",
            "error": "MoveAbort(..., 3)"
        })))
        .unwrap();
        assert_eq!(err.to_string(), "transaction failed with error: MoveAbort(..., 3)");
    }

    #[test]
    fn test_kind_bytes_reject_unresolved() {
        let pt = ProgrammableTransaction {
            inputs: vec![CallArg::UnresolvedObject(parse_address("0x1", "id").unwrap())],
            commands: vec![],
        };
        assert!(transaction_kind_bytes(&pt).is_err());
    }

    #[test]
    fn test_kind_bytes_start_with_programmable_tag() {
        let pt = ProgrammableTransaction {
            inputs: vec![CallArg::Pure(vec![1])],
            commands: vec![Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)])],
        };
        let bytes = transaction_kind_bytes(&pt).unwrap();
        assert_eq!(bytes[0], 0);
        let decoded: TransactionKind = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, TransactionKind::ProgrammableTransaction(pt));
    }

    #[test]
    fn test_describe_calls() {
        let pt = ProgrammableTransaction {
            inputs: vec![],
            commands: vec![Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: parse_address("0x5", "pkg").unwrap(),
                module: Identifier::new("counter").unwrap(),
                function: Identifier::new("increment").unwrap(),
                type_arguments: vec![],
                arguments: vec![],
            }))],
        };
        assert!(describe_calls(&pt).ends_with("::counter::increment"));
        assert_eq!(describe_calls(&ProgrammableTransaction::default()), "programmable transaction");
    }
}
