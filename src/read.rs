//! Reading objects straight from a fullnode.

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use sui_bind_types::encoding::normalize_address;
use sui_bind_types::ObjectRef;
use sui_transport::{SuiObjectResponse, SuiRpc};

use crate::object_resolver::ResolvedObject;

pub fn read_object(client: &dyn SuiRpc, object_id: &str) -> Result<SuiObjectResponse> {
    let id = normalize_address(object_id)
        .map_err(|e| anyhow!("invalid object ID {}: {}", object_id, e))?;
    client
        .get_object(&id)
        .with_context(|| format!("error getting object with id {}", object_id))
}

/// Current version and digest of an object.
pub fn get_object_ref(client: &dyn SuiRpc, object_id: &str) -> Result<ObjectRef> {
    let response = read_object(client, object_id)?;
    if let Some(error) = response.error {
        bail!("failed to read object {}: {}", object_id, error);
    }
    let data = response
        .data
        .ok_or_else(|| anyhow!("failed to read object {}: no data", object_id))?;
    Ok(ResolvedObject::from_data(&data)?.object_ref())
}

/// Deserialize the named field of a Move object's parsed content.
pub fn object_field_value<T: DeserializeOwned>(response: &SuiObjectResponse, field: &str) -> Result<T> {
    let content = response
        .data
        .as_ref()
        .and_then(|d| d.content.as_ref())
        .ok_or_else(|| anyhow!("object does not contain any content"))?;
    let fields = content
        .get("fields")
        .and_then(|f| f.as_object())
        .ok_or_else(|| anyhow!("object content does not have fields"))?;
    let value = fields
        .get(field)
        .ok_or_else(|| anyhow!("object does not contain a '{}' field", field))?;
    serde_json::from_value(value.clone())
        .with_context(|| format!("failed to deserialize field '{}'", field))
}
