//! Shared types for the sui-move-bind workspace.
//!
//! This crate provides the foundational pieces every other crate builds on:
//!
//! - [`encoding`]: address normalization, hex and base64 helpers
//! - [`type_parsing`]: Move type-string parsing and formatting
//! - [`transaction`]: the BCS wire types of a programmable transaction
//!   ([`CallArg`], [`ObjectArg`], [`Argument`], [`Command`], [`TransactionData`], ...)

pub mod encoding;
pub mod transaction;
pub mod type_parsing;

// Re-export commonly used types at crate root
pub use encoding::{
    address_from_bytes, base64_decode, base64_encode, format_address, normalize_address,
    parse_address, parse_hex_bytes, SUI_ADDRESS_LENGTH,
};
pub use transaction::{
    Argument, CallArg, Command, GasData, ObjectArg, ObjectDigest, ObjectID, ObjectRef,
    ProgrammableMoveCall, ProgrammableTransaction, SequenceNumber, SuiAddress, TransactionData,
    TransactionDataV1, TransactionExpiration, TransactionKind,
};
pub use type_parsing::{
    format_type_tag, parse_type_tag, split_generic, split_type_params, strip_reference,
    vector_inner, Reference,
};

/// Fully-qualified type of the native gas coin.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";
