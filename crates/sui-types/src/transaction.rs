//! BCS wire types of a programmable transaction.
//!
//! Variant order on every enum is load-bearing: BCS writes the variant index,
//! so these must stay in the order the chain declares them.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use fastcrypto::encoding::{Base58, Encoding};
use move_core_types::account_address::AccountAddress;
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type ObjectID = AccountAddress;
pub type SuiAddress = AccountAddress;
pub type SequenceNumber = u64;

// =============================================================================
// Object references
// =============================================================================

/// 32-byte object digest, base58 in JSON, length-prefixed bytes in BCS.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectDigest([u8; 32]);

impl ObjectDigest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn inner(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base58::encode(self.0))
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for ObjectDigest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = Base58::decode(s).map_err(|e| anyhow!("invalid digest '{}': {}", s, e))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| anyhow!("invalid digest '{}': {} bytes, expected 32", s, v.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("object digest must be 32 bytes"))?;
        Ok(Self(array))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectArg {
    /// A Move object, either immutable or owned mutable.
    ImmOrOwnedObject(ObjectRef),
    /// A shared Move object; `mutable` asks for a mutable reference.
    SharedObject {
        id: ObjectID,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
    /// A Move object that can be received in this transaction.
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectID {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }

    /// True when both args are the same variant over the same object.
    pub fn same_object(&self, other: &ObjectArg) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.id() == other.id()
    }
}

/// One transaction input.
///
/// The two unresolved variants are builder-side placeholders. They are never
/// serialized; attempting to do so is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS-encoded pure value.
    Pure(Vec<u8>),
    Object(ObjectArg),
    /// An object known only by id, waiting for an on-chain lookup.
    #[serde(skip)]
    UnresolvedObject(ObjectID),
    /// A value that was never BCS-encoded.
    #[serde(skip)]
    UnresolvedPure(serde_json::Value),
}

impl CallArg {
    pub fn is_resolved(&self) -> bool {
        matches!(self, CallArg::Pure(_) | CallArg::Object(_))
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            CallArg::Pure(_) => "Pure",
            CallArg::Object(_) => "Object",
            CallArg::UnresolvedObject(_) => "UnresolvedObject",
            CallArg::UnresolvedPure(_) => "UnresolvedPure",
        }
    }

    /// Encode a value as a pure input.
    pub fn pure<T: Serialize>(value: &T) -> Result<Self> {
        Ok(CallArg::Pure(bcs::to_bytes(value)?))
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin.
    GasCoin,
    /// Index into the transaction inputs.
    Input(u16),
    /// Result of an earlier command.
    Result(u16),
    /// One value of an earlier command returning several.
    NestedResult(u16, u16),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::GasCoin => write!(f, "GasCoin"),
            Argument::Input(i) => write!(f, "Input({})", i),
            Argument::Result(i) => write!(f, "Result({})", i),
            Argument::NestedResult(i, j) => write!(f, "NestedResult({},{})", i, j),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl fmt::Display for ProgrammableMoveCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            crate::encoding::format_address(&self.package),
            self.module,
            self.function
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Fails when an unresolved placeholder is still present.
    pub fn check_inputs_resolved(&self) -> Result<()> {
        for (i, input) in self.inputs.iter().enumerate() {
            if !input.is_resolved() {
                bail!(
                    "transaction input {} is still {}",
                    i,
                    input.variant_name()
                );
            }
        }
        Ok(())
    }
}

// =============================================================================
// Transaction data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    /// A programmable transaction paid for by `sender` out of `gas_payment`.
    pub fn new_programmable(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data: GasData {
                payment: gas_payment,
                owner: sender,
                price: gas_price,
                budget: gas_budget,
            },
            expiration: TransactionExpiration::None,
        })
    }

    pub fn kind(&self) -> &TransactionKind {
        match self {
            TransactionData::V1(v1) => &v1.kind,
        }
    }

    pub fn sender(&self) -> SuiAddress {
        match self {
            TransactionData::V1(v1) => v1.sender,
        }
    }

    pub fn gas_data(&self) -> &GasData {
        match self {
            TransactionData::V1(v1) => &v1.gas_data,
        }
    }

    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>> {
        bcs::to_bytes(self).map_err(|e| anyhow!("failed to serialize transaction data: {}", e))
    }
}
