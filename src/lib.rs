//! Sui Move call encoding and programmable transaction assembly
//!
//! Turns typed parameter values into BCS-encoded transaction inputs,
//! resolves object ids into ownership-aware object inputs, assembles
//! deduplicated programmable transactions and decodes dev-inspect results:
//!
//! - **Codec**: [`codec::Codec`] encodes and decodes Move values by type string
//! - **Encoding a call**: [`encoder::EncodedCall`] and [`contract::BoundContract`]
//! - **Assembly**: [`ptb::PtbBuilder`] with input deduplication in [`call_args`]
//! - **Submission**: [`transaction`] for execute and dev-inspect, [`gas`] for gas selection
//!
//! Node access goes through [`sui_transport::SuiRpc`]; signing through
//! [`signer::Signer`].

#![allow(clippy::too_many_arguments)]

pub mod call_args;
pub mod codec;
pub mod contract;
pub mod encoder;
pub mod gas;
pub mod generics;
pub mod method;
pub mod object_resolver;
pub mod ptb;
pub mod read;
pub mod signer;
pub mod transaction;

pub use call_args::CallArgManager;
pub use codec::{CallValue, Codec, CodecError, MoveValue, Object, StructDecoderRegistry};
pub use contract::BoundContract;
pub use encoder::{EncodedArgValue, EncodedCall, EncodedCallArgument, ModuleInformation};
pub use gas::{TxOpts, DEFAULT_GAS_BUDGET};
pub use generics::GenericTypeResolver;
pub use method::Method;
pub use object_resolver::{get_object, ObjectResolver, OwnerKind, ResolvedObject};
pub use ptb::PtbBuilder;
pub use read::{get_object_ref, object_field_value, read_object};
pub use signer::Signer;
pub use transaction::{dev_inspect_ptb, execute_ptb, failed_tx_error, CallOpts};
