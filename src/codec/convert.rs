//! Caller values to transaction inputs.

use anyhow::{anyhow, bail, Context, Result};
use move_core_types::account_address::AccountAddress;
use sui_bind_types::encoding::parse_address;
use sui_bind_types::type_parsing::{strip_reference, Reference};
use sui_bind_types::{Argument, CallArg, ObjectArg};

use super::{is_pure_type, Codec, MoveValue};

/// An object as seen by the encoder: its id and, for shared objects, the
/// version it was shared at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub id: String,
    pub initial_shared_version: Option<u64>,
}

impl Object {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial_shared_version: None,
        }
    }

    pub fn shared(id: impl Into<String>, initial_shared_version: u64) -> Self {
        Self {
            id: id.into(),
            initial_shared_version: Some(initial_shared_version),
        }
    }
}

/// The value a caller passes for one Move parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Move(MoveValue),
    Object(Object),
    /// Result of an earlier command in the same transaction.
    Argument(Argument),
    /// A fixed 32-byte value (digests, hashes, raw ids).
    Bytes32([u8; 32]),
}

macro_rules! call_value_from_move {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CallValue {
                fn from(v: $t) -> Self {
                    CallValue::Move(MoveValue::from(v))
                }
            }
        )*
    };
}

call_value_from_move!(bool, u8, u16, u32, u64, u128, String, &str, Vec<u8>, Vec<MoveValue>);

impl From<MoveValue> for CallValue {
    fn from(v: MoveValue) -> Self {
        CallValue::Move(v)
    }
}

impl From<Object> for CallValue {
    fn from(o: Object) -> Self {
        CallValue::Object(o)
    }
}

impl From<Argument> for CallValue {
    fn from(a: Argument) -> Self {
        CallValue::Argument(a)
    }
}

impl From<[u8; 32]> for CallValue {
    fn from(b: [u8; 32]) -> Self {
        CallValue::Bytes32(b)
    }
}

impl Codec {
    /// Turn one parameter value into a transaction input for `type_str`.
    ///
    /// Pure types are BCS-encoded. Object parameters become a shared-object
    /// input when the initial shared version is already known and an
    /// `UnresolvedObject` otherwise; the object resolver fills those in later.
    pub fn to_call_arg(&self, type_str: &str, value: &CallValue) -> Result<CallArg> {
        let (reference, base) = strip_reference(type_str.trim());

        match value {
            CallValue::Argument(arg) => {
                bail!("chained argument {} cannot be converted to an input", arg)
            }
            CallValue::Object(obj) => object_call_arg(obj, reference),
            CallValue::Bytes32(bytes) => {
                if is_pure_type(base) {
                    // vector<u8> takes the slice itself, address-like types the raw 32 bytes
                    let value = MoveValue::Bytes(bytes.to_vec());
                    let encoded = self
                        .encode(&value, base)
                        .with_context(|| format!("encoding 32-byte value as {}", base))?;
                    Ok(CallArg::Pure(encoded))
                } else {
                    Ok(CallArg::UnresolvedObject(AccountAddress::new(*bytes)))
                }
            }
            CallValue::Move(v) => {
                if is_pure_type(base) {
                    let encoded = self
                        .encode(v, base)
                        .with_context(|| format!("encoding {} value as {}", v.kind(), base))?;
                    return Ok(CallArg::Pure(encoded));
                }
                let id = match v {
                    MoveValue::Address(s) | MoveValue::String(s) => s,
                    other => bail!(
                        "object parameter {} needs an object id, got {} value",
                        type_str,
                        other.kind()
                    ),
                };
                if !id.starts_with("0x") {
                    bail!("object id '{}' for {} must start with 0x", id, type_str);
                }
                object_call_arg(&Object::new(id.clone()), reference)
            }
        }
    }
}

fn object_call_arg(obj: &Object, reference: Reference) -> Result<CallArg> {
    let id = parse_address(&obj.id, "object ID")?;
    Ok(match obj.initial_shared_version {
        Some(initial_shared_version) => CallArg::Object(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable: reference == Reference::Mutable,
        }),
        None => CallArg::UnresolvedObject(id),
    })
}

/// Parse a JSON-ish value for `type_str` and convert it in one step.
pub fn json_to_call_arg(codec: &Codec, type_str: &str, value: &serde_json::Value) -> Result<CallArg> {
    let move_value = MoveValue::from_json(value, type_str)
        .map_err(|e| anyhow!("invalid value for {}: {}", type_str, e))?;
    codec.to_call_arg(type_str, &CallValue::Move(move_value))
}
