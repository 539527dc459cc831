//! Programmable transaction assembly.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use sui_bind_types::{Argument, CallArg, Command, ProgrammableMoveCall, ProgrammableTransaction};
use tracing::debug;

use crate::call_args::CallArgManager;
use crate::encoder::{EncodedArgValue, EncodedCall, EncodedCallArgument};
use crate::object_resolver::ObjectResolver;

/// Builds one programmable transaction, command by command.
///
/// Inputs are deduplicated across every appended call, so two calls that
/// take the same shared object reference a single input.
#[derive(Debug, Clone, Default)]
pub struct PtbBuilder {
    inputs: CallArgManager,
    commands: Vec<Command>,
}

impl PtbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on top of an existing transaction.
    pub fn from_transaction(pt: ProgrammableTransaction) -> Self {
        Self {
            inputs: CallArgManager::with_existing(pt.inputs),
            commands: pt.commands,
        }
    }

    pub fn inputs(&self) -> &[CallArg] {
        self.inputs.inputs()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Resolve, validate and append an encoded call.
    ///
    /// Returns the call's result, usable as an argument of later commands.
    pub fn append_call(&mut self, resolver: &ObjectResolver, encoded: &EncodedCall) -> Result<Argument> {
        let resolved = encoded
            .call_args
            .iter()
            .enumerate()
            .map(|(i, arg)| match &arg.value {
                EncodedArgValue::Argument(_) => Ok(arg.clone()),
                EncodedArgValue::CallArg(call_arg) => {
                    let resolved = resolver
                        .resolve_call_arg(call_arg, arg.type_name())
                        .with_context(|| format!("failed to resolve CallArg at index {}", i))?;
                    Ok(EncodedCallArgument::call_arg(resolved, arg.type_name.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let call = EncodedCall {
            call_args: resolved,
            ..encoded.clone()
        };
        call.validate_call_args()
            .with_context(|| format!("invalid arguments for {}", call))?;

        let arguments = self
            .inputs
            .convert_encoded_call_args(&call.call_args)
            .context("failed to convert encoded call arguments")?;
        let move_call = call.to_move_call(arguments)?;
        debug!(call = %move_call, inputs = self.inputs.len(), "appending move call");
        self.move_call(move_call)
    }

    /// Push a move call whose arguments are already slots of this builder.
    pub fn move_call(&mut self, call: ProgrammableMoveCall) -> Result<Argument> {
        self.command(Command::MoveCall(Box::new(call)))
    }

    /// Add an input, deduplicating objects.
    pub fn input(&mut self, arg: CallArg) -> Result<Argument> {
        self.inputs.add_call_arg(arg)
    }

    /// Add a BCS-encoded pure input.
    pub fn pure<T: Serialize>(&mut self, value: &T) -> Result<Argument> {
        self.input(CallArg::pure(value)?)
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, recipient: Argument) -> Result<Argument> {
        self.command(Command::TransferObjects(objects, recipient))
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> Result<Argument> {
        self.command(Command::SplitCoins(coin, amounts))
    }

    pub fn merge_coins(&mut self, target: Argument, sources: Vec<Argument>) -> Result<Argument> {
        self.command(Command::MergeCoins(target, sources))
    }

    fn command(&mut self, command: Command) -> Result<Argument> {
        let index = u16::try_from(self.commands.len())
            .map_err(|_| anyhow!("too many commands: index {} exceeds u16", self.commands.len()))?;
        self.commands.push(command);
        Ok(Argument::Result(index))
    }

    /// Finish the transaction; every input must be resolved.
    pub fn finish(self) -> Result<ProgrammableTransaction> {
        let pt = ProgrammableTransaction {
            inputs: self.inputs.into_inputs(),
            commands: self.commands,
        };
        pt.check_inputs_resolved()?;
        Ok(pt)
    }
}
