//! Wire messages for remote Subject/Microtopic lookups
//!
//! Request: `{"id": <number>}`.
//! Reply: `{"<entity>": object|null, "error": string|null}`, where `<entity>`
//! is `subject` or `microtopic`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Lookup request payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GetByIdRequest {
    pub id: i64,
}

impl GetByIdRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<bytes::Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Into::into)
    }
}

/// Decoded lookup reply
#[derive(Debug, Clone, PartialEq)]
pub enum LookupReply<T> {
    /// The remote side returned the entity
    Found(T),
    /// The entity field was absent or `null` and no error was reported
    Missing,
    /// The remote side reported an error
    Failed(String),
}

/// Decode a reply whose entity lives under `key`
pub fn decode_lookup_reply<T: DeserializeOwned>(
    data: &[u8],
    key: &str,
) -> Result<LookupReply<T>, serde_json::Error> {
    let mut reply: serde_json::Map<String, JsonValue> = serde_json::from_slice(data)?;

    if let Some(message) = reply.remove("error").and_then(error_message) {
        return Ok(LookupReply::Failed(message));
    }

    match reply.remove(key) {
        None | Some(JsonValue::Null) => Ok(LookupReply::Missing),
        Some(entity) => serde_json::from_value(entity).map(LookupReply::Found),
    }
}

/// Extract a meaningful error message; empty strings and empty objects are not errors
fn error_message(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::String(s) => Some(s),
        JsonValue::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
