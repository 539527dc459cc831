#![allow(dead_code, unused_imports)]
//! Shared test utilities for integration tests.
//!
//! - `chain`: in-memory node implementing `SuiRpc`
//! - `assertions`: assertion helpers with better error messages

pub mod assertions;
pub mod chain;

use std::sync::Arc;

use anyhow::Result;
use sui_bind_types::encoding::base64_encode;
use sui_move_bind::{BoundContract, CallOpts, Signer};

pub use assertions::{assert_error_contains, assert_ok};
pub use chain::{
    addr, id, FakeChain, ABORT_ERROR, COUNTER_ID, COUNTER_INITIAL_SHARED_VERSION, GAS_COIN_ID,
    PACKAGE_ID, REFERENCE_GAS_PRICE, SENDER, TICKET_ID,
};

/// Signs with a fixed address; the signature is the length of the payload.
pub struct FakeSigner {
    address: String,
}

impl FakeSigner {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }
}

impl Signer for FakeSigner {
    fn sign(&self, tx_bytes: &[u8]) -> Result<Vec<String>> {
        Ok(vec![base64_encode(&(tx_bytes.len() as u64).to_le_bytes())])
    }

    fn address(&self) -> Result<String> {
        Ok(self.address.clone())
    }
}

pub fn chain() -> Arc<FakeChain> {
    Arc::new(FakeChain::new())
}

pub fn call_opts() -> CallOpts {
    CallOpts::new(Arc::new(FakeSigner::new(SENDER)))
}

pub fn contract(chain: &Arc<FakeChain>, module: &str) -> BoundContract {
    BoundContract::new(PACKAGE_ID, "test", module, chain.clone()).unwrap()
}

/// `0x5eed::counter::Counter` with the given reference prefix.
pub fn counter_type(prefix: &str) -> String {
    format!("{}{}::counter::Counter", prefix, PACKAGE_ID)
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
