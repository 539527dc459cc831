//! # BCS Encoding/Decoding of Move Values
//!
//! Type-directed conversion between [`MoveValue`] and the canonical BCS bytes.
//!
//! ## Supported Types
//!
//! | Type | Encode | Decode | Notes |
//! |------|--------|--------|-------|
//! | `bool` | ✓ | ✓ | 1 byte, strictly 0x00 or 0x01 |
//! | `u8`, `u16`, `u32`, `u64` | ✓ | ✓ | Little-endian, range checked |
//! | `u128`, `u256` | ✓ | ✓ | Through [`BigUint`], never a native integer |
//! | `address`, `0x2::object::ID` | ✓ | ✓ | 32 bytes |
//! | `0x1::string::String`, `0x1::ascii::String` | ✓ | ✓ | ULEB128 length + UTF-8 |
//! | `vector<T>` | ✓ | ✓ | Any depth, any supported `T` |
//! | `0x1::option::Option<T>` | ✓ | ✓ | As a vector of zero or one element |
//! | registered structs | - | ✓ | Via [`StructDecoderRegistry`] |
//!
//! Fixed-width primitives decoded at the top level must be given exactly
//! their width; variable-length values must consume the whole input.

pub mod convert;
pub mod dev_inspect;
mod error;
mod registry;
mod value;

use std::sync::Arc;

use num_bigint::BigUint;
use sui_bind_types::encoding::{normalize_address, SUI_ADDRESS_LENGTH};
use sui_bind_types::type_parsing::{split_generic, strip_reference, vector_inner};

pub use convert::{CallValue, Object};
pub use dev_inspect::{decode_command_results, decode_dev_inspect_results};
pub use error::CodecError;
pub use registry::{StructDecoder, StructDecoderRegistry};
pub use value::{parse_biguint, MoveValue};

// =============================================================================
// Type classification
// =============================================================================

/// True if `type_str` is `<addr>::<module>::<name>` with `addr` equal to
/// `expected_addr` in any width.
fn is_framework_type(type_str: &str, expected_addr: &str, module: &str, name: &str) -> bool {
    let parts: Vec<&str> = type_str.split("::").collect();
    if parts.len() != 3 || parts[1] != module || parts[2] != name {
        return false;
    }
    match (normalize_address(parts[0]), normalize_address(expected_addr)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `0x1::string::String` or `0x1::ascii::String`.
pub fn is_string_type(type_str: &str) -> bool {
    is_framework_type(type_str, "0x1", "string", "String")
        || is_framework_type(type_str, "0x1", "ascii", "String")
}

/// `0x2::object::ID`, which is a bare 32-byte address on the wire.
pub fn is_object_id_type(type_str: &str) -> bool {
    is_framework_type(type_str, "0x2", "object", "ID")
}

/// Inner type of `0x1::option::Option<T>`.
pub fn option_inner(type_str: &str) -> Option<&str> {
    let (base, inner) = split_generic(type_str)?;
    if is_framework_type(base, "0x1", "option", "Option") {
        Some(inner.trim())
    } else {
        None
    }
}

/// True for types passed as pure BCS bytes rather than object references.
pub fn is_pure_type(type_str: &str) -> bool {
    let (_, t) = strip_reference(type_str.trim());
    if fixed_width(t).is_some() || is_string_type(t) {
        return true;
    }
    if let Some(inner) = vector_inner(t) {
        return is_pure_type(inner);
    }
    if let Some(inner) = option_inner(t) {
        return is_pure_type(inner);
    }
    false
}

fn fixed_width(type_str: &str) -> Option<usize> {
    match type_str {
        "bool" | "u8" => Some(1),
        "u16" => Some(2),
        "u32" => Some(4),
        "u64" => Some(8),
        "u128" => Some(16),
        "u256" | "address" => Some(32),
        t if is_object_id_type(t) => Some(SUI_ADDRESS_LENGTH),
        _ => None,
    }
}

// =============================================================================
// Byte helpers
// =============================================================================

/// Return a reversed copy of `bytes`; the input is left untouched.
pub fn reverse_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

/// Encode a ULEB128 length prefix.
pub fn encode_uleb128(mut value: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            bytes.push(byte);
            break;
        } else {
            bytes.push(byte | 0x80);
        }
    }
    bytes
}

/// Decode a ULEB128 length. Returns (value, bytes_consumed).
///
/// BCS lengths fit in a u32, so anything longer than five bytes is rejected.
pub fn decode_uleb128(bytes: &[u8]) -> Result<(usize, usize), CodecError> {
    let mut result: u64 = 0;
    for (offset, byte) in bytes.iter().take(5).enumerate() {
        result |= ((byte & 0x7f) as u64) << (7 * offset);
        if byte & 0x80 == 0 {
            if result > u32::MAX as u64 {
                return Err(CodecError::InvalidLength);
            }
            return Ok((result as usize, offset + 1));
        }
    }
    Err(CodecError::InvalidLength)
}

/// Little-endian fixed-width bytes of `n`: big-endian, left-padded, reversed.
fn biguint_to_le(n: &BigUint, width: usize, type_name: &str) -> Result<Vec<u8>, CodecError> {
    let be = n.to_bytes_be();
    if be.len() > width {
        return Err(CodecError::Overflow {
            type_name: type_name.to_string(),
            value: n.to_string(),
        });
    }
    let mut padded = vec![0u8; width - be.len()];
    padded.extend_from_slice(&be);
    Ok(reverse_bytes(&padded))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn take(&mut self, n: usize, type_name: &str) -> Result<&'a [u8], CodecError> {
        if self.rest().len() < n {
            return Err(CodecError::UnexpectedEnd {
                type_name: type_name.to_string(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn length(&mut self) -> Result<usize, CodecError> {
        let (len, consumed) = decode_uleb128(self.rest())?;
        self.pos += consumed;
        Ok(len)
    }
}

// =============================================================================
// Codec
// =============================================================================

/// BCS codec backed by a struct decoder registry.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    registry: Arc<StructDecoderRegistry>,
}

impl Codec {
    /// A codec with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Arc<StructDecoderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<StructDecoderRegistry> {
        &self.registry
    }

    /// Decode `bytes` as a value of `move_type`.
    ///
    /// A registered struct decoder takes precedence and its result is
    /// returned as-is.
    pub fn decode(&self, bytes: &[u8], move_type: &str) -> Result<MoveValue, CodecError> {
        let (_, t) = strip_reference(move_type.trim());

        if let Some(decoder) = self.registry.get(t) {
            return decoder(bytes);
        }

        if let Some(width) = fixed_width(t) {
            if bytes.len() != width {
                return Err(CodecError::LengthMismatch {
                    type_name: t.to_string(),
                    expected: width,
                    actual: bytes.len(),
                });
            }
            return decode_fixed(bytes, t);
        }

        let mut cursor = Cursor::new(bytes);
        let value = self.decode_from(&mut cursor, t)?;
        let remaining = cursor.rest().len();
        if remaining != 0 {
            return Err(CodecError::TrailingBytes {
                type_name: t.to_string(),
                remaining,
            });
        }
        Ok(value)
    }

    fn decode_from(&self, cursor: &mut Cursor<'_>, t: &str) -> Result<MoveValue, CodecError> {
        if let Some(width) = fixed_width(t) {
            let bytes = cursor.take(width, t)?;
            return decode_fixed(bytes, t);
        }

        if is_string_type(t) {
            let len = cursor.length()?;
            let bytes = cursor.take(len, t)?;
            let s = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 {
                type_name: t.to_string(),
            })?;
            return Ok(MoveValue::String(s.to_string()));
        }

        if let Some(inner) = vector_inner(t) {
            let len = cursor.length()?;
            if inner == "u8" {
                return Ok(MoveValue::Bytes(cursor.take(len, t)?.to_vec()));
            }
            // Every element takes at least one byte.
            if len > cursor.rest().len() {
                return Err(CodecError::UnexpectedEnd {
                    type_name: t.to_string(),
                });
            }
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(self.decode_from(cursor, inner)?);
            }
            return Ok(MoveValue::Vector(items));
        }

        if let Some(inner) = option_inner(t) {
            let tag = cursor.take(1, t)?[0];
            return match tag {
                0 => Ok(MoveValue::Vector(vec![])),
                1 => Ok(MoveValue::Vector(vec![self.decode_from(cursor, inner)?])),
                other => Err(CodecError::Custom(format!(
                    "invalid option tag {} for {}",
                    other, t
                ))),
            };
        }

        Err(CodecError::UnsupportedType {
            type_name: t.to_string(),
            raw: cursor.rest().to_vec(),
        })
    }

    /// Encode `value` as BCS bytes of `move_type`.
    pub fn encode(&self, value: &MoveValue, move_type: &str) -> Result<Vec<u8>, CodecError> {
        let (_, t) = strip_reference(move_type.trim());
        let mut out = Vec::new();
        self.encode_into(value, t, &mut out)?;
        Ok(out)
    }

    fn encode_into(&self, value: &MoveValue, t: &str, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let mismatch = || CodecError::ValueMismatch {
            type_name: t.to_string(),
            value_kind: value.kind(),
        };

        match t {
            "bool" => {
                let b = value.as_bool().ok_or_else(mismatch)?;
                out.push(b as u8);
            }
            "u8" | "u16" | "u32" | "u64" | "u128" | "u256" => {
                let n = value.as_biguint().ok_or_else(mismatch)?;
                let width = fixed_width(t).unwrap_or(8);
                out.extend(biguint_to_le(&n, width, t)?);
            }
            t if t == "address" || is_object_id_type(t) => match value {
                MoveValue::Address(s) | MoveValue::String(s) => {
                    let normalized = normalize_address(s)
                        .map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
                    let bytes = hex::decode(&normalized[2..])
                        .map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
                    out.extend(bytes);
                }
                MoveValue::Bytes(b) if b.len() == SUI_ADDRESS_LENGTH => out.extend_from_slice(b),
                _ => return Err(mismatch()),
            },
            t if is_string_type(t) => {
                let bytes = match value {
                    MoveValue::String(s) => s.as_bytes(),
                    MoveValue::Bytes(b) => b.as_slice(),
                    _ => return Err(mismatch()),
                };
                out.extend(encode_uleb128(bytes.len()));
                out.extend_from_slice(bytes);
            }
            t => {
                if let Some(inner) = vector_inner(t) {
                    match value {
                        MoveValue::Bytes(b) if inner == "u8" => {
                            out.extend(encode_uleb128(b.len()));
                            out.extend_from_slice(b);
                        }
                        MoveValue::Vector(items) => {
                            out.extend(encode_uleb128(items.len()));
                            for item in items {
                                self.encode_into(item, inner, out)?;
                            }
                        }
                        _ => return Err(mismatch()),
                    }
                } else if let Some(inner) = option_inner(t) {
                    match value.as_vec() {
                        Some([]) => out.push(0),
                        Some([item]) => {
                            out.push(1);
                            self.encode_into(item, inner, out)?;
                        }
                        _ => return Err(mismatch()),
                    }
                } else {
                    return Err(CodecError::UnsupportedType {
                        type_name: t.to_string(),
                        raw: vec![],
                    });
                }
            }
        }
        Ok(())
    }
}

fn decode_fixed(bytes: &[u8], t: &str) -> Result<MoveValue, CodecError> {
    let length_err = || CodecError::LengthMismatch {
        type_name: t.to_string(),
        expected: fixed_width(t).unwrap_or(0),
        actual: bytes.len(),
    };
    match t {
        "bool" => match bytes[0] {
            0 => Ok(MoveValue::Bool(false)),
            1 => Ok(MoveValue::Bool(true)),
            other => Err(CodecError::InvalidBool(other)),
        },
        "u8" => Ok(MoveValue::U8(bytes[0])),
        "u16" => Ok(MoveValue::U16(u16::from_le_bytes(
            bytes.try_into().map_err(|_| length_err())?,
        ))),
        "u32" => Ok(MoveValue::U32(u32::from_le_bytes(
            bytes.try_into().map_err(|_| length_err())?,
        ))),
        "u64" => Ok(MoveValue::U64(u64::from_le_bytes(
            bytes.try_into().map_err(|_| length_err())?,
        ))),
        "u128" => Ok(MoveValue::U128(BigUint::from_bytes_be(&reverse_bytes(bytes)))),
        "u256" => Ok(MoveValue::U256(BigUint::from_bytes_be(&reverse_bytes(bytes)))),
        _ => Ok(MoveValue::Address(format!("0x{}", hex::encode(bytes)))),
    }
}

// =============================================================================
// Tests
// =============================================================================
