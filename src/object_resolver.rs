//! Object id to ownership-aware transaction input, with a lookup cache.
//!
//! The cache has no expiry. Versions and digests of owned objects change on
//! every mutation, so long-lived callers should [`ObjectResolver::clear_cache`]
//! between transactions that touch the same owned objects.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use parking_lot::RwLock;
use sui_bind_types::encoding::{format_address, normalize_address, parse_address};
use sui_bind_types::type_parsing::{strip_reference, Reference};
use sui_bind_types::{CallArg, ObjectArg, ObjectDigest, ObjectID, ObjectRef};
use sui_transport::{OwnerRecord, SuiObjectData, SuiRpc};
use tracing::{debug, trace};

use crate::codec::Object;

// =============================================================================
// Resolved objects
// =============================================================================

/// Who owns an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerKind {
    /// Shared object. The version should always be present; a node that
    /// reports a shared owner without it yields `None`.
    Shared { initial_shared_version: Option<u64> },
    AddressOwner(String),
    ObjectOwner(String),
    Immutable,
    /// No owner information in the response.
    Unknown,
}

impl OwnerKind {
    /// Classify an owner record: shared > address-owned > object-owned > immutable.
    pub fn classify(record: Option<&OwnerRecord>) -> Self {
        let Some(record) = record else {
            return OwnerKind::Unknown;
        };
        if record.shared || record.initial_shared_version.is_some() {
            OwnerKind::Shared {
                initial_shared_version: record.initial_shared_version,
            }
        } else if let Some(owner) = &record.address_owner {
            OwnerKind::AddressOwner(owner.clone())
        } else if let Some(owner) = &record.object_owner {
            OwnerKind::ObjectOwner(owner.clone())
        } else if record.immutable {
            OwnerKind::Immutable
        } else {
            OwnerKind::Unknown
        }
    }
}

/// Everything known about one on-chain object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObject {
    pub object_id: ObjectID,
    pub version: u64,
    pub digest: ObjectDigest,
    pub owner: OwnerKind,
    pub object_type: Option<String>,
}

impl ResolvedObject {
    pub fn from_data(data: &SuiObjectData) -> Result<Self> {
        let object_id = parse_address(&data.object_id, "object ID")?;
        let digest: ObjectDigest = data
            .digest
            .parse()
            .with_context(|| format!("object {}", data.object_id))?;
        Ok(Self {
            object_id,
            version: data.version,
            digest,
            owner: OwnerKind::classify(data.owner.as_ref()),
            object_type: data.object_type.clone(),
        })
    }

    pub fn initial_shared_version(&self) -> Option<u64> {
        match self.owner {
            OwnerKind::Shared {
                initial_shared_version,
            } => initial_shared_version,
            _ => None,
        }
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.object_id,
            version: self.version,
            digest: self.digest,
        }
    }

    /// Light projection handed to callers of [`ObjectResolver::get_object`].
    pub fn to_object(&self) -> Object {
        Object {
            id: format_address(&self.object_id),
            initial_shared_version: self.initial_shared_version(),
        }
    }

    /// Input for this object, mutable or not.
    ///
    /// Shared objects carry their initial shared version; everything else is
    /// passed by exact version and digest.
    pub fn to_object_arg(&self, mutable: bool) -> Result<ObjectArg> {
        match &self.owner {
            OwnerKind::Shared {
                initial_shared_version: Some(initial_shared_version),
            } => Ok(ObjectArg::SharedObject {
                id: self.object_id,
                initial_shared_version: *initial_shared_version,
                mutable,
            }),
            OwnerKind::Shared {
                initial_shared_version: None,
            } => bail!(
                "shared object {} missing initial shared version",
                self.object_id.to_hex_literal()
            ),
            _ => Ok(ObjectArg::ImmOrOwnedObject(self.object_ref())),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

pub struct ObjectResolver {
    client: Arc<dyn SuiRpc>,
    cache: RwLock<HashMap<String, ResolvedObject>>,
}

impl ObjectResolver {
    pub fn new(client: Arc<dyn SuiRpc>) -> Self {
        Self {
            client,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &Arc<dyn SuiRpc> {
        &self.client
    }

    /// Look up an object, consulting the cache first.
    pub fn get_object(&self, object_id: &str) -> Result<Object> {
        Ok(self.resolve_object(object_id)?.to_object())
    }

    /// Full descriptor of an object, consulting the cache first.
    pub fn resolve_object(&self, object_id: &str) -> Result<ResolvedObject> {
        let key = normalize_address(object_id)
            .map_err(|e| anyhow!("invalid object ID {}: {}", object_id, e))?;

        if let Some(cached) = self.cache.read().get(&key) {
            trace!(object_id = %key, "object cache hit");
            return Ok(cached.clone());
        }

        debug!(object_id = %key, "object cache miss, querying node");
        let resolved = self.fetch(&key)?;
        self.cache.write().insert(key, resolved.clone());
        Ok(resolved)
    }

    fn fetch(&self, object_id: &str) -> Result<ResolvedObject> {
        let response = self
            .client
            .get_object(object_id)
            .with_context(|| format!("failed to fetch object {}", object_id))?;
        if let Some(error) = response.error {
            bail!("object error for {}: {}", object_id, error);
        }
        let data = response
            .data
            .ok_or_else(|| anyhow!("object {} not found", object_id))?;
        ResolvedObject::from_data(&data)
    }

    /// Replace an `UnresolvedObject` input with a concrete object input.
    ///
    /// Mutability comes from `declared_type`: a `&mut ` parameter asks for a
    /// mutable reference. Pure and object inputs pass through unchanged.
    pub fn resolve_call_arg(&self, arg: &CallArg, declared_type: &str) -> Result<CallArg> {
        match arg {
            CallArg::UnresolvedPure(_) => bail!("cannot resolve UnresolvedPure input"),
            CallArg::UnresolvedObject(id) => {
                let id = id.to_hex_literal();
                let resolved = self
                    .resolve_object(&id)
                    .with_context(|| format!("failed to resolve UnresolvedObject {}", id))?;
                let (reference, _) = strip_reference(declared_type.trim());
                let object_arg = resolved.to_object_arg(reference == Reference::Mutable)?;
                trace!(object_id = %id, ?object_arg, "resolved object input");
                Ok(CallArg::Object(object_arg))
            }
            CallArg::Pure(_) | CallArg::Object(_) => Ok(arg.clone()),
        }
    }

    /// Drop every cached object.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

impl std::fmt::Debug for ObjectResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectResolver")
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// One-off lookup without keeping a resolver around.
pub fn get_object(client: Arc<dyn SuiRpc>, object_id: &str) -> Result<Object> {
    ObjectResolver::new(client).get_object(object_id)
}
