//! Gas coin selection and gas parameters.

use anyhow::{anyhow, Context, Result};
use move_core_types::language_storage::TypeTag;
use sui_bind_types::encoding::{normalize_address, parse_address};
use sui_bind_types::{parse_type_tag, ObjectDigest, ObjectRef, SUI_COIN_TYPE};
use sui_transport::{Coin, SuiRpc};
use tracing::debug;

pub const DEFAULT_GAS_BUDGET: u64 = 200_000_000;

const COIN_PAGE_LIMIT: usize = 50;

/// Caller overrides for gas. Unset fields fall back to the first SUI coin,
/// [`DEFAULT_GAS_BUDGET`] and the node's reference gas price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOpts {
    pub gas_object: Option<String>,
    pub gas_budget: Option<u64>,
    pub gas_price: Option<u64>,
}

impl TxOpts {
    pub fn gas_budget(&self) -> u64 {
        self.gas_budget.unwrap_or(DEFAULT_GAS_BUDGET)
    }
}

fn is_sui_coin(coin: &Coin, sui: &TypeTag) -> bool {
    parse_type_tag(&coin.coin_type)
        .map(|tag| &tag == sui)
        .unwrap_or(false)
}

fn coin_ref(coin: &Coin) -> Result<ObjectRef> {
    let digest: ObjectDigest = coin
        .digest
        .parse()
        .with_context(|| format!("coin {}", coin.coin_object_id))?;
    Ok(ObjectRef {
        object_id: parse_address(&coin.coin_object_id, "coin object ID")?,
        version: coin.version,
        digest,
    })
}

/// First SUI coin owned by `owner` accepted by `accept`.
///
/// Pages are fetched lazily; the walk stops at the first match.
fn find_sui_coin<F>(client: &dyn SuiRpc, owner: &str, mut accept: F) -> Result<Option<ObjectRef>>
where
    F: FnMut(&ObjectRef) -> bool,
{
    let owner = normalize_address(owner).map_err(|e| anyhow!("invalid address {}: {}", owner, e))?;
    let sui = parse_type_tag(SUI_COIN_TYPE)?;

    let mut cursor: Option<String> = None;
    loop {
        let page = client
            .get_all_coins(&owner, cursor.as_deref(), Some(COIN_PAGE_LIMIT))
            .with_context(|| format!("failed to get coins for address {}", owner))?;
        for coin in page.data.iter().filter(|c| is_sui_coin(c, &sui)) {
            let coin = coin_ref(coin)?;
            if accept(&coin) {
                return Ok(Some(coin));
            }
        }
        match page.next_cursor {
            Some(next) if page.has_next_page => cursor = Some(next),
            _ => return Ok(None),
        }
    }
}

/// First SUI coin owned by `owner`.
pub fn fetch_default_gas_coin_ref(client: &dyn SuiRpc, owner: &str) -> Result<ObjectRef> {
    let coin = find_sui_coin(client, owner, |_| true)?
        .ok_or_else(|| anyhow!("no SUI coins found for address {}", owner))?;
    debug!(coin = %coin.object_id.to_hex_literal(), version = coin.version, "selected default gas coin");
    Ok(coin)
}

/// Reference of a specific gas coin, which must be a SUI coin owned by `owner`.
pub fn gas_object_ref(client: &dyn SuiRpc, gas_object: &str, owner: &str) -> Result<ObjectRef> {
    let wanted = parse_address(gas_object, "gas object ID")?;
    find_sui_coin(client, owner, |coin| coin.object_id == wanted)?
        .ok_or_else(|| anyhow!("gas object {} not found in SUI coins owned by {}", gas_object, owner))
}

/// Gas payment for a transaction sent by `sender`.
pub fn resolve_gas_payment(client: &dyn SuiRpc, opts: &TxOpts, sender: &str) -> Result<ObjectRef> {
    match &opts.gas_object {
        Some(id) if !id.is_empty() => gas_object_ref(client, id, sender),
        _ => fetch_default_gas_coin_ref(client, sender),
    }
}

/// Caller override, else the node's reference gas price.
pub fn resolve_gas_price(client: &dyn SuiRpc, opts: &TxOpts) -> Result<u64> {
    if let Some(price) = opts.gas_price {
        return Ok(price);
    }
    client
        .get_reference_gas_price()
        .context("failed to get reference gas price")
}
