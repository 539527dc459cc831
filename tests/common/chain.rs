//! In-memory Sui node.
//!
//! Decodes the BCS transactions it receives and runs a small set of Move
//! functions natively:
//!
//! - `counter::increment(&mut Counter)`
//! - `counter::add(&mut Counter, u64)`
//! - `counter::get_count(&Counter): u64`
//! - `counter::abort_always(&mut Counter)`
//! - `counter::consume_ticket(Ticket)`
//! - `complex::flatten_address(address, vector<address>): vector<address>`
//! - `complex::flatten_u8(vector<vector<u8>>): vector<u8>`

use anyhow::{anyhow, bail, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};
use move_core_types::account_address::AccountAddress;
use sui_bind_types::encoding::{base64_decode, normalize_address, parse_address};
use sui_bind_types::{
    Argument, CallArg, Command, ObjectArg, ObjectDigest, ProgrammableTransaction, TransactionData,
    TransactionKind,
};
use sui_transport::{
    CoinPage, DevInspectResults, ExecuteTransactionRequestType, SuiObjectResponse, SuiRpc,
    TransactionBlockResponse, TransactionBlockResponseOptions,
};

pub const PACKAGE_ID: &str = "0x5eed";
pub const COUNTER_ID: &str = "0xc0ffee";
pub const TICKET_ID: &str = "0x7e57";
pub const SENDER: &str = "0xa11ce";
pub const GAS_COIN_ID: &str = "0x6a5";
pub const COUNTER_INITIAL_SHARED_VERSION: u64 = 3;
pub const REFERENCE_GAS_PRICE: u64 = 1_000;
pub const ABORT_ERROR: &str = "MoveAbort(MoveLocation { module: counter, function: 3 }, 7) in command 0";

/// Per-command return values: `(bcs bytes, type)`.
type CommandResults = Vec<Vec<(Vec<u8>, String)>>;

#[derive(Debug, Clone)]
struct ChainState {
    counter: u64,
    counter_version: u64,
    ticket_version: u64,
    ticket_consumed: bool,
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub get_object_calls: usize,
    pub executed: Vec<TransactionData>,
    pub request_types: Vec<ExecuteTransactionRequestType>,
    pub dev_inspected: Vec<ProgrammableTransaction>,
    pub dev_inspect_gas_prices: Vec<Option<u64>>,
    pub last_results: CommandResults,
}

pub struct FakeChain {
    state: Mutex<ChainState>,
    recorded: Mutex<Recorded>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Full-width form of a short hex id.
pub fn id(hex: &str) -> String {
    normalize_address(hex).unwrap()
}

pub fn addr(hex: &str) -> AccountAddress {
    parse_address(hex, "address").unwrap()
}

fn digest_for(seed: u64) -> ObjectDigest {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    ObjectDigest::new(bytes)
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState {
                counter: 0,
                counter_version: 10,
                ticket_version: 4,
                ticket_consumed: false,
            }),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn counter(&self) -> u64 {
        self.state.lock().counter
    }

    pub fn recorded(&self) -> parking_lot::MutexGuard<'_, Recorded> {
        self.recorded.lock()
    }

    fn object_json(&self, object_id: &str) -> Value {
        let state = self.state.lock();
        if object_id == id(COUNTER_ID) {
            json!({
                "data": {
                    "objectId": object_id,
                    "version": state.counter_version.to_string(),
                    "digest": digest_for(state.counter_version).to_string(),
                    "type": format!("{}::counter::Counter", id(PACKAGE_ID)),
                    "owner": { "Shared": { "initial_shared_version": COUNTER_INITIAL_SHARED_VERSION } },
                    "content": {
                        "dataType": "moveObject",
                        "fields": { "id": { "id": object_id }, "value": state.counter.to_string() }
                    }
                }
            })
        } else if object_id == id(TICKET_ID) && !state.ticket_consumed {
            json!({
                "data": {
                    "objectId": object_id,
                    "version": state.ticket_version,
                    "digest": digest_for(state.ticket_version + 1_000).to_string(),
                    "type": format!("{}::counter::Ticket", id(PACKAGE_ID)),
                    "owner": { "AddressOwner": id(SENDER) },
                    "content": { "dataType": "moveObject", "fields": { "id": { "id": object_id } } }
                }
            })
        } else {
            json!({ "error": { "code": "notExists", "object_id": object_id } })
        }
    }

    fn run(&self, pt: &ProgrammableTransaction, state: &mut ChainState) -> Result<CommandResults> {
        let mut results: CommandResults = Vec::new();
        for (index, command) in pt.commands.iter().enumerate() {
            let returned = match command {
                Command::MoveCall(call) => {
                    if call.package != addr(PACKAGE_ID) {
                        bail!("package {} not found in command {}", call.package, index);
                    }
                    let args = &call.arguments;
                    match (call.module.as_str(), call.function.as_str()) {
                        ("counter", "increment") => {
                            counter_arg(pt, args, 0, true)?;
                            state.counter += 1;
                            vec![]
                        }
                        ("counter", "add") => {
                            counter_arg(pt, args, 0, true)?;
                            let amount: u64 = bcs::from_bytes(&value_arg(pt, &results, args, 1)?)?;
                            state.counter += amount;
                            vec![]
                        }
                        ("counter", "get_count") => {
                            counter_arg(pt, args, 0, false)?;
                            vec![(bcs::to_bytes(&state.counter)?, "u64".to_string())]
                        }
                        ("counter", "abort_always") => bail!(ABORT_ERROR),
                        ("counter", "consume_ticket") => {
                            self.ticket_arg(pt, args, state)?;
                            state.ticket_consumed = true;
                            vec![]
                        }
                        ("complex", "flatten_address") => {
                            let first: [u8; 32] = bcs::from_bytes(&value_arg(pt, &results, args, 0)?)?;
                            let rest: Vec<[u8; 32]> =
                                bcs::from_bytes(&value_arg(pt, &results, args, 1)?)?;
                            let mut all = vec![first];
                            all.extend(rest);
                            vec![(bcs::to_bytes(&all)?, "vector<address>".to_string())]
                        }
                        ("complex", "flatten_u8") => {
                            let nested: Vec<Vec<u8>> =
                                bcs::from_bytes(&value_arg(pt, &results, args, 0)?)?;
                            let flat: Vec<u8> = nested.into_iter().flatten().collect();
                            vec![(bcs::to_bytes(&flat)?, "vector<u8>".to_string())]
                        }
                        (module, function) => bail!("function {}::{} not found", module, function),
                    }
                }
                Command::TransferObjects(..) | Command::SplitCoins(..) | Command::MergeCoins(..) => vec![],
            };
            results.push(returned);
        }
        Ok(results)
    }

    fn ticket_arg(&self, pt: &ProgrammableTransaction, args: &[Argument], state: &ChainState) -> Result<()> {
        match input(pt, args, 0)? {
            CallArg::Object(ObjectArg::ImmOrOwnedObject(r))
                if r.object_id == addr(TICKET_ID)
                    && r.version == state.ticket_version
                    && r.digest == digest_for(state.ticket_version + 1_000) =>
            {
                Ok(())
            }
            other => bail!("ticket must be passed by reference, got {:?}", other),
        }
    }

    fn success_effects(digest: &str) -> Value {
        json!({
            "status": { "status": "success" },
            "gasUsed": {
                "computationCost": "1000000",
                "storageCost": "2000000",
                "storageRebate": "500000",
                "nonRefundableStorageFee": "5000"
            },
            "transactionDigest": digest
        })
    }
}

fn input<'a>(pt: &'a ProgrammableTransaction, args: &[Argument], position: usize) -> Result<&'a CallArg> {
    match args.get(position) {
        Some(Argument::Input(i)) => pt
            .inputs
            .get(*i as usize)
            .ok_or_else(|| anyhow!("input {} out of bounds", i)),
        other => bail!("argument {} should be an input, got {:?}", position, other),
    }
}

fn counter_arg(pt: &ProgrammableTransaction, args: &[Argument], position: usize, needs_mut: bool) -> Result<()> {
    match input(pt, args, position)? {
        CallArg::Object(ObjectArg::SharedObject {
            id: object_id,
            initial_shared_version,
            mutable,
        }) => {
            if *object_id != addr(COUNTER_ID) {
                bail!("object {} is not the counter", object_id);
            }
            if *initial_shared_version != COUNTER_INITIAL_SHARED_VERSION {
                bail!("wrong initial shared version {}", initial_shared_version);
            }
            if needs_mut && !mutable {
                bail!("counter passed immutably to a &mut parameter");
            }
            Ok(())
        }
        other => bail!("counter must be a shared object input, got {:?}", other),
    }
}

fn value_arg(
    pt: &ProgrammableTransaction,
    results: &CommandResults,
    args: &[Argument],
    position: usize,
) -> Result<Vec<u8>> {
    match args.get(position) {
        Some(Argument::Input(i)) => match pt.inputs.get(*i as usize) {
            Some(CallArg::Pure(bytes)) => Ok(bytes.clone()),
            other => bail!("input {} should be pure, got {:?}", i, other),
        },
        Some(Argument::Result(i)) => results
            .get(*i as usize)
            .and_then(|r| r.first())
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| anyhow!("result {} has no value", i)),
        Some(Argument::NestedResult(i, j)) => results
            .get(*i as usize)
            .and_then(|r| r.get(*j as usize))
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| anyhow!("nested result ({}, {}) has no value", i, j)),
        other => bail!("unsupported argument {:?}", other),
    }
}

fn results_json(results: &CommandResults) -> Value {
    Value::Array(
        results
            .iter()
            .map(|values| {
                let returns: Vec<Value> = values.iter().map(|(bytes, ty)| json!([bytes, ty])).collect();
                json!({ "returnValues": returns })
            })
            .collect(),
    )
}

impl SuiRpc for FakeChain {
    fn get_object(&self, object_id: &str) -> Result<SuiObjectResponse> {
        self.recorded.lock().get_object_calls += 1;
        Ok(serde_json::from_value(self.object_json(&id(object_id)))?)
    }

    fn get_all_coins(&self, owner: &str, cursor: Option<&str>, _limit: Option<usize>) -> Result<CoinPage> {
        if owner != id(SENDER) {
            return Ok(CoinPage::default());
        }
        let page = match cursor {
            None => json!({
                "data": [{
                    "coinType": format!("{}::usdc::USDC", id(PACKAGE_ID)),
                    "coinObjectId": id("0x05dc"),
                    "version": "2",
                    "digest": digest_for(2).to_string(),
                    "balance": "10"
                }],
                "nextCursor": "coins-2",
                "hasNextPage": true
            }),
            Some(_) => json!({
                "data": [{
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": id(GAS_COIN_ID),
                    "version": "7",
                    "digest": digest_for(7).to_string(),
                    "balance": "5000000000"
                }],
                "nextCursor": null,
                "hasNextPage": false
            }),
        };
        Ok(serde_json::from_value(page)?)
    }

    fn get_reference_gas_price(&self) -> Result<u64> {
        Ok(REFERENCE_GAS_PRICE)
    }

    fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signatures: &[String],
        _options: &TransactionBlockResponseOptions,
        request_type: ExecuteTransactionRequestType,
    ) -> Result<TransactionBlockResponse> {
        if signatures.is_empty() {
            bail!("transaction is not signed");
        }
        let data: TransactionData = bcs::from_bytes(&base64_decode(tx_bytes, "transaction")?)?;
        let TransactionKind::ProgrammableTransaction(pt) = data.kind().clone();

        let mut recorded = self.recorded.lock();
        recorded.executed.push(data.clone());
        recorded.request_types.push(request_type);
        let digest = format!("tx{}", recorded.executed.len());

        let mut state = self.state.lock();
        let mut scratch = state.clone();
        let effects = match self.run(&pt, &mut scratch) {
            Ok(results) => {
                scratch.counter_version += 1;
                *state = scratch;
                recorded.last_results = results;
                Self::success_effects(&digest)
            }
            Err(e) => json!({
                "status": { "status": "failure", "error": e.to_string() },
                "transactionDigest": digest
            }),
        };

        Ok(serde_json::from_value(json!({
            "digest": digest,
            "effects": effects,
            "objectChanges": [],
            "balanceChanges": []
        }))?)
    }

    fn dev_inspect_transaction_block(
        &self,
        sender: &str,
        tx_kind_bytes: &str,
        gas_price: Option<u64>,
    ) -> Result<DevInspectResults> {
        if sender != id(SENDER) {
            bail!("unexpected sender {}", sender);
        }
        let kind: TransactionKind = bcs::from_bytes(&base64_decode(tx_kind_bytes, "transaction kind")?)?;
        let TransactionKind::ProgrammableTransaction(pt) = kind;

        let mut scratch = self.state.lock().clone();
        let mut recorded = self.recorded.lock();
        recorded.dev_inspected.push(pt.clone());
        recorded.dev_inspect_gas_prices.push(gas_price);

        let response = match self.run(&pt, &mut scratch) {
            Ok(results) => {
                let body = json!({
                    "effects": Self::success_effects("inspect"),
                    "results": results_json(&results),
                    "events": []
                });
                recorded.last_results = results;
                body
            }
            Err(e) => json!({
                "effects": { "status": { "status": "failure", "error": e.to_string() } },
                "error": e.to_string(),
                "events": []
            }),
        };
        Ok(serde_json::from_value(response)?)
    }
}
