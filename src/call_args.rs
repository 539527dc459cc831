//! Flat, deduplicated input list of one programmable transaction.

use anyhow::{anyhow, Context, Result};
use sui_bind_types::{Argument, CallArg, ObjectArg};
use tracing::debug;

use crate::encoder::{EncodedArgValue, EncodedCallArgument};

/// Collects transaction inputs and hands out `Argument::Input` indices.
///
/// The same object referenced by several commands is stored once. When a
/// shared object is first added immutably and later requested mutably, the
/// stored input is upgraded to mutable; it is never downgraded, and owned
/// objects are left alone.
///
/// One manager belongs to one transaction under construction.
#[derive(Debug, Clone, Default)]
pub struct CallArgManager {
    inputs: Vec<CallArg>,
}

impl CallArgManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from the inputs of a transaction already being built.
    pub fn with_existing(inputs: Vec<CallArg>) -> Self {
        Self { inputs }
    }

    /// Add one input, returning its index.
    pub fn add_call_arg(&mut self, arg: CallArg) -> Result<Argument> {
        match &arg {
            CallArg::Object(object) => {
                if let Some(index) = self.find_object(object) {
                    if let ObjectArg::SharedObject { mutable: true, .. } = object {
                        self.escalate_mutability(index);
                    }
                    return input_argument(index);
                }
            }
            CallArg::UnresolvedObject(id) => {
                let existing = self
                    .inputs
                    .iter()
                    .position(|input| matches!(input, CallArg::UnresolvedObject(other) if other == id));
                if let Some(index) = existing {
                    return input_argument(index);
                }
            }
            CallArg::Pure(_) | CallArg::UnresolvedPure(_) => {}
        }

        let index = self.inputs.len();
        let argument = input_argument(index)?;
        self.inputs.push(arg);
        Ok(argument)
    }

    fn find_object(&self, object: &ObjectArg) -> Option<usize> {
        self.inputs.iter().position(|input| match input {
            CallArg::Object(existing) => existing.same_object(object),
            _ => false,
        })
    }

    fn escalate_mutability(&mut self, index: usize) {
        if let Some(CallArg::Object(ObjectArg::SharedObject { id, mutable, .. })) =
            self.inputs.get_mut(index)
        {
            if !*mutable {
                debug!(object_id = %id.to_hex_literal(), index, "shared input escalated to mutable");
                *mutable = true;
            }
        }
    }

    /// Add every input in order.
    pub fn convert_call_args(&mut self, args: &[CallArg]) -> Result<Vec<Argument>> {
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                self.add_call_arg(arg.clone())
                    .with_context(|| format!("call arg {}", i))
            })
            .collect()
    }

    /// Add encoded call arguments; chained results pass through untouched.
    pub fn convert_encoded_call_args(
        &mut self,
        args: &[EncodedCallArgument],
    ) -> Result<Vec<Argument>> {
        args.iter()
            .enumerate()
            .map(|(i, arg)| match &arg.value {
                EncodedArgValue::Argument(argument) => Ok(*argument),
                EncodedArgValue::CallArg(call_arg) => self
                    .add_call_arg(call_arg.clone())
                    .with_context(|| format!("encoded call arg {}", i)),
            })
            .collect()
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn into_inputs(self) -> Vec<CallArg> {
        self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

fn input_argument(index: usize) -> Result<Argument> {
    u16::try_from(index)
        .map(Argument::Input)
        .map_err(|_| anyhow!("too many transaction inputs: index {} exceeds u16", index))
}
