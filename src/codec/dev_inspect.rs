//! Decoding of dev-inspect return values.
//!
//! A dev-inspect response carries one record per command:
//!
//! ```text
//! [{"returnValues": [[[1, 0, 0, 0, 0, 0, 0, 0], "u64"], ...]}, ...]
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use super::{Codec, MoveValue};
use crate::generics::GenericTypeResolver;

/// Decode the return values of the first command.
///
/// `return_types` are the declared Move return types, in order; when a
/// resolver is given each one is passed through it first.
pub fn decode_dev_inspect_results(
    codec: &Codec,
    results: &Value,
    return_types: &[String],
    resolver: Option<&GenericTypeResolver>,
) -> Result<Vec<MoveValue>> {
    decode_command_results(codec, results, 0, return_types, resolver)
}

/// Decode the return values of command `index`.
pub fn decode_command_results(
    codec: &Codec,
    results: &Value,
    index: usize,
    return_types: &[String],
    resolver: Option<&GenericTypeResolver>,
) -> Result<Vec<MoveValue>> {
    let records = results
        .as_array()
        .ok_or_else(|| anyhow!("dev-inspect results should be an array, got {}", results))?;
    if records.is_empty() {
        bail!("no execution results found");
    }
    let record = records.get(index).ok_or_else(|| {
        anyhow!(
            "no execution result for command {} ({} results)",
            index,
            records.len()
        )
    })?;

    let return_values = match record.get("returnValues") {
        Some(Value::Array(values)) => values.as_slice(),
        Some(Value::Null) | None => &[],
        Some(other) => bail!("returnValues should be an array, got {}", other),
    };

    if return_values.len() != return_types.len() {
        bail!(
            "expected {} return values, got {}",
            return_types.len(),
            return_values.len()
        );
    }

    return_values
        .iter()
        .zip(return_types)
        .enumerate()
        .map(|(i, (entry, declared))| {
            let pair = entry
                .as_array()
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("invalid return value format at index {}", i))?;
            let bytes = extract_bcs_bytes(&pair[0])
                .with_context(|| format!("failed to extract BCS bytes at index {}", i))?;
            let move_type = match resolver {
                Some(r) => r.resolve(declared),
                None => declared.clone(),
            };
            codec.decode(&bytes, &move_type).with_context(|| {
                format!("failed to decode value at index {} (type {})", i, move_type)
            })
        })
        .collect()
}

fn extract_bcs_bytes(value: &Value) -> Result<Vec<u8>> {
    let items = value
        .as_array()
        .ok_or_else(|| anyhow!("BCS bytes should be an array, got {}", value))?;
    items
        .iter()
        .enumerate()
        .map(|(i, b)| {
            b.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| anyhow!("BCS byte at index {} is not a byte: {}", i, b))
        })
        .collect()
}
