//! Encoding utilities for addresses, hex and base64.
//!
//! Sui addresses (and object IDs) are 32-byte values written in several forms:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! Everything that compares or caches addresses goes through [`normalize_address`].

use anyhow::{anyhow, bail, Result};
use move_core_types::account_address::AccountAddress;

/// Length of a Sui address / object ID in bytes.
pub const SUI_ADDRESS_LENGTH: usize = 32;

// =============================================================================
// Address Normalization
// =============================================================================

/// Normalize an address string to lowercase with 0x prefix and 64 hex characters.
///
/// Unlike a plain pad-and-lowercase, this rejects empty input, non-hex
/// characters and values wider than 32 bytes.
///
/// # Examples
///
/// ```
/// use sui_bind_types::encoding::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2").unwrap(),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert!(normalize_address("").is_err());
/// ```
pub fn normalize_address(addr: &str) -> Result<String> {
    let addr = addr.trim();
    if addr.is_empty() {
        bail!("empty address string");
    }
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    if hex.is_empty() {
        bail!("address '{}' has no hex digits", addr);
    }
    if hex.len() > SUI_ADDRESS_LENGTH * 2 {
        bail!(
            "address '{}' is longer than {} bytes",
            addr,
            SUI_ADDRESS_LENGTH
        );
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("address '{}' contains non-hex characters", addr);
    }
    Ok(format!("0x{:0>64}", hex))
}

/// Parse a hex string to an AccountAddress with a context-aware error message.
///
/// # Arguments
/// * `hex_str` - Hex string (with or without 0x prefix, short or full form)
/// * `context` - Description for error messages (e.g., "object ID", "package address")
pub fn parse_address(hex_str: &str, context: &str) -> Result<AccountAddress> {
    let normalized =
        normalize_address(hex_str).map_err(|e| anyhow!("Invalid {} '{}': {}", context, hex_str, e))?;
    AccountAddress::from_hex_literal(&normalized)
        .map_err(|e| anyhow!("Invalid {} '{}': {}", context, hex_str, e))
}

/// Render raw address bytes as a full 0x-prefixed hex string.
pub fn address_from_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() != SUI_ADDRESS_LENGTH {
        bail!(
            "invalid address bytes length: expected {} bytes, got {}",
            SUI_ADDRESS_LENGTH,
            bytes.len()
        );
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Format an AccountAddress as a full 66-character hex string (0x + 64 hex chars).
pub fn format_address(addr: &AccountAddress) -> String {
    format!("0x{}", hex::encode(addr.as_ref()))
}

/// Parse a hex string (optional 0x prefix) into raw bytes.
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>> {
    let trimmed = hex_str.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(stripped).map_err(|e| anyhow!("Invalid {} hex '{}': {}", context, hex_str, e))
}

// =============================================================================
// Base64 Encoding/Decoding
// =============================================================================

/// Encode bytes to a standard base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a base64 string with a context-aware error message.
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("Failed to decode {} from base64: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xABC").unwrap(),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        assert_eq!(
            normalize_address("  abc ").unwrap(),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        let full = "0x1111111111111111111111111111111111111111111111111111111111111111";
        assert_eq!(normalize_address(full).unwrap(), full);
    }

    #[test]
    fn test_normalize_address_rejects_garbage() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("0x").is_err());
        assert!(normalize_address("0xzz").is_err());
        let too_long = format!("0x{}", "1".repeat(65));
        assert!(normalize_address(&too_long).is_err());
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("0x2", "package").unwrap();
        assert_eq!(addr, AccountAddress::from_hex_literal("0x2").unwrap());

        let err = parse_address("nothex", "package").unwrap_err();
        assert!(err.to_string().contains("Invalid package"));
    }

    #[test]
    fn test_address_from_bytes() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x2a;
        let s = address_from_bytes(&bytes).unwrap();
        assert_eq!(s.len(), 66);
        assert!(s.ends_with("2a"));
        assert!(address_from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_format_address() {
        let addr = AccountAddress::from_hex_literal("0x2").unwrap();
        assert_eq!(
            format_address(&addr),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_base64_decode_error_names_context() {
        let err = base64_decode("not-valid-base64!!!", "tx bytes").unwrap_err();
        assert!(err.to_string().contains("tx bytes"));
        assert_eq!(base64_decode(&base64_encode(b"abc"), "x").unwrap(), b"abc");
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("0xdeadbeef", "t").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(parse_hex_bytes("0xabc", "t").is_err());
    }
}
