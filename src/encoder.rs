//! Encoding of one Move call into typed, ready-to-assemble arguments.

use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use sui_bind_types::encoding::{normalize_address, parse_address};
use sui_bind_types::{format_type_tag, parse_type_tag, Argument, CallArg, ProgrammableMoveCall};

use crate::codec::{CallValue, Codec};
use crate::generics::GenericTypeResolver;

/// Either a transaction input or the result of an earlier command.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedArgValue {
    CallArg(CallArg),
    Argument(Argument),
}

/// One encoded parameter together with its declared Move type.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCallArgument {
    pub value: EncodedArgValue,
    pub type_name: Option<String>,
}

impl EncodedCallArgument {
    pub fn call_arg(arg: CallArg, type_name: Option<String>) -> Self {
        Self {
            value: EncodedArgValue::CallArg(arg),
            type_name,
        }
    }

    pub fn argument(arg: Argument, type_name: Option<String>) -> Self {
        Self {
            value: EncodedArgValue::Argument(arg),
            type_name,
        }
    }

    pub fn is_call_arg(&self) -> bool {
        matches!(self.value, EncodedArgValue::CallArg(_))
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.value, EncodedArgValue::Argument(_))
    }

    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or_default()
    }
}

/// Where a function lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInformation {
    /// Normalized, full-width package id.
    pub package_id: String,
    pub package_name: String,
    pub module_name: String,
}

impl ModuleInformation {
    pub fn new(
        package_id: &str,
        package_name: impl Into<String>,
        module_name: impl Into<String>,
    ) -> Result<Self> {
        let package_id = normalize_address(package_id)
            .map_err(|e| anyhow!("invalid package ID {}: {}", package_id, e))?;
        Ok(Self {
            package_id,
            package_name: package_name.into(),
            module_name: module_name.into(),
        })
    }
}

impl fmt::Display for ModuleInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package_id, self.module_name)
    }
}

/// A Move call with every argument encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCall {
    pub module: ModuleInformation,
    pub function: String,
    pub type_args: Vec<TypeTag>,
    pub call_args: Vec<EncodedCallArgument>,
    pub return_types: Vec<String>,
    pub type_params: Vec<String>,
}

impl EncodedCall {
    /// Encode `param_values` against `param_types`.
    ///
    /// When both `type_params` and `type_args` are given, generic parameter
    /// types are rewritten to their concrete types before conversion.
    /// Chained [`CallValue::Argument`]s are kept as-is with their type.
    #[allow(clippy::too_many_arguments)]
    pub fn encode(
        codec: &Codec,
        module: ModuleInformation,
        function: &str,
        type_args: &[String],
        type_params: &[String],
        param_types: &[String],
        param_values: Vec<CallValue>,
        return_types: Vec<String>,
    ) -> Result<Self> {
        if param_types.len() != param_values.len() {
            bail!(
                "paramTypes and paramValues must have the same length ({} vs {})",
                param_types.len(),
                param_values.len()
            );
        }

        let type_tags = type_args
            .iter()
            .map(|arg| {
                parse_type_tag(arg).with_context(|| format!("failed to parse type argument {:?}", arg))
            })
            .collect::<Result<Vec<_>>>()?;

        let resolver = if !type_params.is_empty() && !type_args.is_empty() {
            Some(
                GenericTypeResolver::new(type_params, type_args)
                    .context("failed to create generic type resolver")?,
            )
        } else {
            None
        };

        let call_args = param_types
            .iter()
            .zip(param_values)
            .enumerate()
            .map(|(i, (declared, value))| {
                let type_name = match &resolver {
                    Some(r) => r.resolve(declared),
                    None => declared.clone(),
                };
                match value {
                    CallValue::Argument(arg) => Ok(EncodedCallArgument::argument(arg, Some(type_name))),
                    value => {
                        let arg = codec.to_call_arg(&type_name, &value).with_context(|| {
                            format!("failed to convert parameter {} ({})", i, type_name)
                        })?;
                        Ok(EncodedCallArgument::call_arg(arg, Some(type_name)))
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            module,
            function: function.to_string(),
            type_args: type_tags,
            call_args,
            return_types,
            type_params: type_params.to_vec(),
        })
    }

    /// Reject inputs that cannot go on the wire.
    pub fn validate_call_args(&self) -> Result<()> {
        for (i, arg) in self.call_args.iter().enumerate() {
            match &arg.value {
                EncodedArgValue::CallArg(CallArg::UnresolvedObject(id)) => bail!(
                    "UnresolvedObject {} detected at parameter {}: resolve the object before assembling",
                    id.to_hex_literal(),
                    i
                ),
                EncodedArgValue::CallArg(CallArg::UnresolvedPure(_)) => bail!(
                    "UnresolvedPure detected at parameter {}: pure values must be BCS-encoded",
                    i
                ),
                EncodedArgValue::CallArg(_) | EncodedArgValue::Argument(_) => {}
            }
        }
        Ok(())
    }

    /// Concrete type-argument strings, in declaration order.
    pub fn type_arg_strings(&self) -> Vec<String> {
        self.type_args.iter().map(format_type_tag).collect()
    }

    /// Return types with generic parameters replaced by this call's type
    /// arguments.
    pub fn resolved_return_types(&self) -> Result<Vec<String>> {
        if self.type_params.is_empty() || self.type_args.is_empty() {
            return Ok(self.return_types.clone());
        }
        let resolver = GenericTypeResolver::new(&self.type_params, &self.type_arg_strings())?;
        Ok(self
            .return_types
            .iter()
            .map(|t| resolver.resolve(t))
            .collect())
    }

    /// The wire command for this call, given its argument slots.
    pub fn to_move_call(&self, arguments: Vec<Argument>) -> Result<ProgrammableMoveCall> {
        Ok(ProgrammableMoveCall {
            package: parse_address(&self.module.package_id, "package ID")?,
            module: Identifier::new(self.module.module_name.as_str())
                .map_err(|e| anyhow!("invalid module name {}: {}", self.module.module_name, e))?,
            function: Identifier::new(self.function.as_str())
                .map_err(|e| anyhow!("invalid function name {}: {}", self.function, e))?,
            type_arguments: self.type_args.clone(),
            arguments,
        })
    }
}

impl fmt::Display for EncodedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.function)
    }
}
