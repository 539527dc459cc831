//! A generated-binding friendly bundle of build, execute and inspect.

use std::sync::Arc;

use anyhow::Result;
use sui_bind_types::ProgrammableTransaction;
use sui_transport::{DevInspectResults, SuiRpc, TransactionBlockResponse};

use crate::transaction::{dev_inspect_ptb, execute_ptb, CallOpts};

pub type BuildFn = Box<dyn Fn() -> Result<ProgrammableTransaction> + Send + Sync>;
pub type ExecuteFn =
    Box<dyn Fn(&dyn SuiRpc, &CallOpts) -> Result<TransactionBlockResponse> + Send + Sync>;
pub type InspectFn = Box<dyn Fn(&dyn SuiRpc, &CallOpts) -> Result<DevInspectResults> + Send + Sync>;

/// One contract method.
///
/// `build` needs neither client nor signer and can feed a larger PTB;
/// `execute` commits the transaction, `inspect` only simulates it.
pub struct Method {
    build: BuildFn,
    execute: ExecuteFn,
    inspect: InspectFn,
}

impl Method {
    pub fn new(build: BuildFn, execute: ExecuteFn, inspect: InspectFn) -> Self {
        Self {
            build,
            execute,
            inspect,
        }
    }

    /// Derive execute and inspect from the build function.
    pub fn from_build<F>(build: F) -> Self
    where
        F: Fn() -> Result<ProgrammableTransaction> + Send + Sync + 'static,
    {
        let build = Arc::new(build);
        let for_execute = Arc::clone(&build);
        let for_inspect = Arc::clone(&build);
        Self {
            build: Box::new(move || build()),
            execute: Box::new(move |client: &dyn SuiRpc, opts: &CallOpts| {
                execute_ptb(client, opts, for_execute()?)
            }),
            inspect: Box::new(move |client: &dyn SuiRpc, opts: &CallOpts| {
                let sender = opts.sender()?;
                dev_inspect_ptb(client, &sender, &for_inspect()?, opts.tx_opts.gas_price)
            }),
        }
    }

    pub fn build(&self) -> Result<ProgrammableTransaction> {
        (self.build)()
    }

    pub fn execute(&self, client: &dyn SuiRpc, opts: &CallOpts) -> Result<TransactionBlockResponse> {
        (self.execute)(client, opts)
    }

    pub fn inspect(&self, client: &dyn SuiRpc, opts: &CallOpts) -> Result<DevInspectResults> {
        (self.inspect)(client, opts)
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method").finish_non_exhaustive()
    }
}
