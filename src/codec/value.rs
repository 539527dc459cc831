//! Typed Move values.

use anyhow::{anyhow, bail, Context, Result};
use num_bigint::BigUint;
use serde_json::{json, Value};
use sui_bind_types::type_parsing::{strip_reference, vector_inner};

use super::{is_object_id_type, is_string_type, option_inner};

/// A Move value, paired with its Move type by context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(BigUint),
    U256(BigUint),
    /// Normalized `0x`-prefixed hex.
    Address(String),
    String(String),
    /// `vector<u8>` payload.
    Bytes(Vec<u8>),
    Vector(Vec<MoveValue>),
    Struct {
        type_name: String,
        fields: Vec<(String, MoveValue)>,
    },
}

impl MoveValue {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveValue::Bool(_) => "bool",
            MoveValue::U8(_) => "u8",
            MoveValue::U16(_) => "u16",
            MoveValue::U32(_) => "u32",
            MoveValue::U64(_) => "u64",
            MoveValue::U128(_) => "u128",
            MoveValue::U256(_) => "u256",
            MoveValue::Address(_) => "address",
            MoveValue::String(_) => "string",
            MoveValue::Bytes(_) => "bytes",
            MoveValue::Vector(_) => "vector",
            MoveValue::Struct { .. } => "struct",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MoveValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant as an arbitrary-precision integer.
    pub fn as_biguint(&self) -> Option<BigUint> {
        match self {
            MoveValue::U8(v) => Some(BigUint::from(*v)),
            MoveValue::U16(v) => Some(BigUint::from(*v)),
            MoveValue::U32(v) => Some(BigUint::from(*v)),
            MoveValue::U64(v) => Some(BigUint::from(*v)),
            MoveValue::U128(v) | MoveValue::U256(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in a u64.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_biguint().and_then(|n| u64::try_from(&n).ok())
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            MoveValue::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MoveValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// `Bytes`, or a `Vector` made only of `U8`s.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            MoveValue::Bytes(b) => Some(b.clone()),
            MoveValue::Vector(items) => items
                .iter()
                .map(|v| match v {
                    MoveValue::U8(b) => Some(*b),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    pub fn as_vec(&self) -> Option<&[MoveValue]> {
        match self {
            MoveValue::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&MoveValue> {
        match self {
            MoveValue::Struct { fields, .. } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// JSON rendering used by the CLI and in logs.
    ///
    /// 128/256-bit integers become decimal strings and byte vectors become
    /// `0x` hex.
    pub fn to_json(&self) -> Value {
        match self {
            MoveValue::Bool(b) => json!(b),
            MoveValue::U8(v) => json!(v),
            MoveValue::U16(v) => json!(v),
            MoveValue::U32(v) => json!(v),
            MoveValue::U64(v) => json!(v),
            MoveValue::U128(v) | MoveValue::U256(v) => json!(v.to_string()),
            MoveValue::Address(a) => json!(a),
            MoveValue::String(s) => json!(s),
            MoveValue::Bytes(b) => json!(format!("0x{}", hex::encode(b))),
            MoveValue::Vector(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            MoveValue::Struct { fields, .. } => Value::Object(
                fields
                    .iter()
                    .map(|(name, v)| (name.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Build a value of `type_str` out of loosely-typed JSON.
    ///
    /// Integers may be numbers or strings (decimal, or `0x` hex for the wide
    /// types); `vector<u8>` accepts a `0x` hex string or a number array;
    /// `Option<T>` maps `null` to an empty vector. An object-typed parameter
    /// takes its object id as a string and comes back as an `Address`.
    pub fn from_json(value: &Value, type_str: &str) -> Result<Self> {
        let (_, base) = strip_reference(type_str.trim());
        match base {
            "bool" => value
                .as_bool()
                .map(MoveValue::Bool)
                .ok_or_else(|| anyhow!("expected bool, got {}", value)),
            "u8" => Ok(MoveValue::U8(json_uint(value, base)?)),
            "u16" => Ok(MoveValue::U16(json_uint(value, base)?)),
            "u32" => Ok(MoveValue::U32(json_uint(value, base)?)),
            "u64" => Ok(MoveValue::U64(json_uint(value, base)?)),
            "u128" => Ok(MoveValue::U128(json_biguint(value)?)),
            "u256" => Ok(MoveValue::U256(json_biguint(value)?)),
            t if t == "address" || is_object_id_type(t) => json_string(value)
                .map(|s| MoveValue::Address(s.to_string())),
            t if is_string_type(t) => json_string(value).map(|s| MoveValue::String(s.to_string())),
            "vector<u8>" => match value {
                Value::String(s) => {
                    let bytes = sui_bind_types::parse_hex_bytes(s, "vector<u8>")?;
                    Ok(MoveValue::Bytes(bytes))
                }
                Value::Array(items) => items
                    .iter()
                    .map(|v| json_uint::<u8>(v, "u8"))
                    .collect::<Result<Vec<u8>>>()
                    .map(MoveValue::Bytes),
                other => bail!("expected hex string or byte array for vector<u8>, got {}", other),
            },
            t => {
                if let Some(inner) = vector_inner(t) {
                    let items = value
                        .as_array()
                        .ok_or_else(|| anyhow!("expected array for {}, got {}", t, value))?;
                    return items
                        .iter()
                        .enumerate()
                        .map(|(i, v)| {
                            MoveValue::from_json(v, inner)
                                .with_context(|| format!("element {} of {}", i, t))
                        })
                        .collect::<Result<Vec<_>>>()
                        .map(MoveValue::Vector);
                }
                if let Some(inner) = option_inner(t) {
                    return match value {
                        Value::Null => Ok(MoveValue::Vector(vec![])),
                        v => Ok(MoveValue::Vector(vec![MoveValue::from_json(v, inner)?])),
                    };
                }
                match value {
                    Value::String(id) if id.starts_with("0x") => Ok(MoveValue::Address(id.clone())),
                    other => bail!("cannot build a {} value from {}", t, other),
                }
            }
        }
    }
}

fn json_string(value: &Value) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| anyhow!("expected string, got {}", value))
}

fn json_uint<T: TryFrom<u64>>(value: &Value, type_name: &str) -> Result<T> {
    let n = match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| anyhow!("{} is not an unsigned integer", n))?,
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid {} '{}'", type_name, s))?,
        other => bail!("expected {} number or string, got {}", type_name, other),
    };
    T::try_from(n).map_err(|_| anyhow!("value {} overflows {}", n, type_name))
}

fn json_biguint(value: &Value) -> Result<BigUint> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(BigUint::from)
            .ok_or_else(|| anyhow!("{} is not an unsigned integer", n)),
        Value::String(s) => parse_biguint(s),
        other => bail!("expected integer number or string, got {}", other),
    }
}

/// Parse a decimal or `0x` hex string into a BigUint.
pub fn parse_biguint(s: &str) -> Result<BigUint> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(s.as_bytes(), 10),
    };
    parsed.ok_or_else(|| anyhow!("invalid integer '{}'", s))
}

impl From<bool> for MoveValue {
    fn from(v: bool) -> Self {
        MoveValue::Bool(v)
    }
}

impl From<u8> for MoveValue {
    fn from(v: u8) -> Self {
        MoveValue::U8(v)
    }
}

impl From<u16> for MoveValue {
    fn from(v: u16) -> Self {
        MoveValue::U16(v)
    }
}

impl From<u32> for MoveValue {
    fn from(v: u32) -> Self {
        MoveValue::U32(v)
    }
}

impl From<u64> for MoveValue {
    fn from(v: u64) -> Self {
        MoveValue::U64(v)
    }
}

impl From<u128> for MoveValue {
    fn from(v: u128) -> Self {
        MoveValue::U128(BigUint::from(v))
    }
}

impl From<String> for MoveValue {
    fn from(v: String) -> Self {
        MoveValue::String(v)
    }
}

impl From<&str> for MoveValue {
    fn from(v: &str) -> Self {
        MoveValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for MoveValue {
    fn from(v: Vec<u8>) -> Self {
        MoveValue::Bytes(v)
    }
}

impl From<Vec<MoveValue>> for MoveValue {
    fn from(v: Vec<MoveValue>) -> Self {
        MoveValue::Vector(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_integers() {
        assert_eq!(MoveValue::from_json(&json!(7), "u8").unwrap(), MoveValue::U8(7));
        assert_eq!(MoveValue::from_json(&json!("70000"), "u32").unwrap(), MoveValue::U32(70000));
        assert!(MoveValue::from_json(&json!(256), "u8").is_err());
        assert_eq!(
            MoveValue::from_json(&json!("340282366920938463463374607431768211455"), "u128").unwrap(),
            MoveValue::U128(BigUint::from(u128::MAX))
        );
        assert_eq!(
            MoveValue::from_json(&json!("0x10"), "u256").unwrap(),
            MoveValue::U256(BigUint::from(16u8))
        );
    }

    #[test]
    fn test_from_json_vectors() {
        assert_eq!(
            MoveValue::from_json(&json!("0x0102"), "vector<u8>").unwrap(),
            MoveValue::Bytes(vec![1, 2])
        );
        assert_eq!(
            MoveValue::from_json(&json!([[1], []]), "vector<vector<u8>>").unwrap(),
            MoveValue::Vector(vec![MoveValue::Bytes(vec![1]), MoveValue::Bytes(vec![])])
        );
        let err = MoveValue::from_json(&json!([1, "x"]), "vector<u64>").unwrap_err();
        assert!(format!("{:#}", err).contains("element 1"));
    }

    #[test]
    fn test_from_json_object_id_any_address_width() {
        let full = "0x0000000000000000000000000000000000000000000000000000000000000002::object::ID";
        for t in ["0x2::object::ID", full] {
            assert_eq!(
                MoveValue::from_json(&json!("7"), t).unwrap(),
                MoveValue::Address("7".into()),
                "{}",
                t
            );
        }
        let bytes = crate::codec::Codec::new()
            .encode(&MoveValue::from_json(&json!("0x7"), full).unwrap(), full)
            .unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 7);
    }

    #[test]
    fn test_from_json_option_and_object() {
        assert_eq!(
            MoveValue::from_json(&Value::Null, "0x1::option::Option<u64>").unwrap(),
            MoveValue::Vector(vec![])
        );
        assert_eq!(
            MoveValue::from_json(&json!("0xabc"), "&mut 0x5::counter::Counter").unwrap(),
            MoveValue::Address("0xabc".to_string())
        );
    }

    #[test]
    fn test_to_json() {
        let v = MoveValue::Vector(vec![
            MoveValue::U128(BigUint::from(5u8)),
            MoveValue::Bytes(vec![0xab]),
        ]);
        assert_eq!(v.to_json(), json!(["5", "0xab"]));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(MoveValue::U256(BigUint::from(4u8)).as_u64(), Some(4));
        assert_eq!(
            MoveValue::Vector(vec![MoveValue::U8(1), MoveValue::U8(2)]).as_bytes(),
            Some(vec![1, 2])
        );
        let s = MoveValue::Struct {
            type_name: "0x1::m::S".into(),
            fields: vec![("count".into(), MoveValue::U64(3))],
        };
        assert_eq!(s.field("count"), Some(&MoveValue::U64(3)));
        assert!(s.field("missing").is_none());
    }
}
