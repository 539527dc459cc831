//! Decoders for Move struct types, keyed by fully-qualified type name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use sui_bind_types::type_parsing::{format_type_tag, parse_type_tag};
use tracing::{debug, warn};

use super::{CodecError, MoveValue};

pub type StructDecoder = Arc<dyn Fn(&[u8]) -> Result<MoveValue, CodecError> + Send + Sync>;

/// Registry of struct decoders consulted by [`super::Codec::decode`].
///
/// Bindings register their struct types once at startup; lookups happen on
/// every decode. Registering a type name that is already present replaces the
/// earlier decoder (last write wins) and logs a warning.
///
/// Type names are canonicalized, so `0x2::foo::Bar` and the full-width
/// address form refer to the same entry.
#[derive(Default)]
pub struct StructDecoderRegistry {
    decoders: RwLock<HashMap<String, StructDecoder>>,
}

impl StructDecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decoder` for `type_name`. Returns true when an earlier
    /// decoder for the same type was replaced.
    pub fn register<F>(&self, type_name: &str, decoder: F) -> bool
    where
        F: Fn(&[u8]) -> Result<MoveValue, CodecError> + Send + Sync + 'static,
    {
        let key = canonical_type_name(type_name);
        let replaced = self
            .decoders
            .write()
            .insert(key.clone(), Arc::new(decoder))
            .is_some();
        if replaced {
            warn!(type_name = %key, "struct decoder replaced");
        } else {
            debug!(type_name = %key, "struct decoder registered");
        }
        replaced
    }

    pub fn get(&self, type_name: &str) -> Option<StructDecoder> {
        let decoders = self.decoders.read();
        if decoders.is_empty() {
            return None;
        }
        decoders.get(&canonical_type_name(type_name)).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.decoders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.read().is_empty()
    }
}

impl std::fmt::Debug for StructDecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decoders = self.decoders.read();
        let mut names: Vec<&String> = decoders.keys().collect();
        names.sort();
        f.debug_struct("StructDecoderRegistry")
            .field("types", &names)
            .finish()
    }
}

fn canonical_type_name(type_name: &str) -> String {
    let trimmed = type_name.trim();
    match parse_type_tag(trimmed) {
        Ok(tag) => format_type_tag(&tag),
        Err(_) => trimmed.to_string(),
    }
}
