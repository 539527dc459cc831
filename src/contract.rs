//! A Move module bound to a fullnode.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use sui_bind_types::Argument;
use sui_transport::{SuiRpc, TransactionBlockResponse};
use tracing::debug;

use crate::codec::{decode_dev_inspect_results, CallValue, Codec, MoveValue};
use crate::encoder::{EncodedCall, ModuleInformation};
use crate::generics::GenericTypeResolver;
use crate::ptb::PtbBuilder;
use crate::transaction::{dev_inspect_ptb, execute_ptb, CallOpts};

/// Encodes, simulates and executes calls into one Move module.
#[derive(Clone)]
pub struct BoundContract {
    module: ModuleInformation,
    client: Arc<dyn SuiRpc>,
    codec: Codec,
}

impl BoundContract {
    pub fn new(
        package_id: &str,
        package_name: &str,
        module_name: &str,
        client: Arc<dyn SuiRpc>,
    ) -> Result<Self> {
        Ok(Self {
            module: ModuleInformation::new(package_id, package_name, module_name)?,
            client,
            codec: Codec::new(),
        })
    }

    /// Use a codec with custom struct decoders registered.
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn package_id(&self) -> &str {
        &self.module.package_id
    }

    pub fn package_name(&self) -> &str {
        &self.module.package_name
    }

    pub fn module_name(&self) -> &str {
        &self.module.module_name
    }

    pub fn module(&self) -> &ModuleInformation {
        &self.module
    }

    pub fn client(&self) -> &Arc<dyn SuiRpc> {
        &self.client
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn encode_call_args(
        &self,
        function: &str,
        type_args: &[String],
        param_types: &[String],
        param_values: Vec<CallValue>,
    ) -> Result<EncodedCall> {
        self.encode_call_args_with_generics(function, type_args, &[], param_types, param_values, vec![])
    }

    pub fn encode_call_args_with_return_types(
        &self,
        function: &str,
        type_args: &[String],
        param_types: &[String],
        param_values: Vec<CallValue>,
        return_types: Vec<String>,
    ) -> Result<EncodedCall> {
        self.encode_call_args_with_generics(
            function,
            type_args,
            &[],
            param_types,
            param_values,
            return_types,
        )
    }

    /// Encode a call whose parameter and return types may mention
    /// `type_params`, bound positionally to `type_args`.
    pub fn encode_call_args_with_generics(
        &self,
        function: &str,
        type_args: &[String],
        type_params: &[String],
        param_types: &[String],
        param_values: Vec<CallValue>,
        return_types: Vec<String>,
    ) -> Result<EncodedCall> {
        EncodedCall::encode(
            &self.codec,
            self.module.clone(),
            function,
            type_args,
            type_params,
            param_types,
            param_values,
            return_types,
        )
    }

    /// Append `encoded` to `builder`, resolving objects through the resolver
    /// of `opts`.
    pub fn append_ptb(
        &self,
        opts: &CallOpts,
        builder: &mut PtbBuilder,
        encoded: &EncodedCall,
    ) -> Result<Argument> {
        let resolver = opts.resolver(&self.client);
        builder
            .append_call(&resolver, encoded)
            .with_context(|| format!("failed to add {} to PTB", encoded))
    }

    /// Simulate `encoded` and decode its return values.
    pub fn call(&self, opts: &CallOpts, encoded: &EncodedCall) -> Result<Vec<MoveValue>> {
        let sender = opts.sender()?;
        let mut builder = PtbBuilder::new();
        self.append_ptb(opts, &mut builder, encoded)?;
        let pt = builder.finish()?;

        let response = dev_inspect_ptb(self.client.as_ref(), &sender, &pt, opts.tx_opts.gas_price)?;
        let results = match response.results {
            Some(results) if !results.is_null() => results,
            _ => return Ok(vec![]),
        };
        if encoded.return_types.is_empty() {
            bail!("no return type information: {}", encoded);
        }

        let resolver = if !encoded.type_params.is_empty() && !encoded.type_args.is_empty() {
            Some(
                GenericTypeResolver::new(&encoded.type_params, &encoded.type_arg_strings())
                    .map_err(|e| anyhow!("failed to create type resolver: {}", e))?,
            )
        } else {
            None
        };

        let values = decode_dev_inspect_results(
            &self.codec,
            &results,
            &encoded.return_types,
            resolver.as_ref(),
        )
        .with_context(|| format!("failed to decode dev inspect results of {}", encoded))?;
        debug!(call = %encoded, returned = values.len(), "call decoded");
        Ok(values)
    }

    /// Sign and submit `encoded` as a single-call transaction.
    pub fn execute_transaction(
        &self,
        opts: &CallOpts,
        encoded: &EncodedCall,
    ) -> Result<TransactionBlockResponse> {
        let mut builder = PtbBuilder::new();
        self.append_ptb(opts, &mut builder, encoded)?;
        execute_ptb(self.client.as_ref(), opts, builder.finish()?)
    }
}

impl std::fmt::Debug for BoundContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundContract")
            .field("module", &self.module)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
