//! Signing seam.

use anyhow::Result;

/// Produces signatures for transaction bytes.
///
/// Key management lives outside this crate; implementations wrap a keystore,
/// an HSM or, in tests, a fixed address.
pub trait Signer: Send + Sync {
    /// Serialized signatures (base64, flag || sig || pubkey) over `tx_bytes`.
    fn sign(&self, tx_bytes: &[u8]) -> Result<Vec<String>>;

    /// Sui address of the signing key.
    fn address(&self) -> Result<String>;
}
