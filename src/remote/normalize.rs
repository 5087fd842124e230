//! Payload normalization
//!
//! A collection read can come back in three shapes:
//!
//! - a JSON array, possibly with `null` holes where entries were deleted
//! - a JSON object keyed by entity id (the usual document-store shape)
//! - `null` when the collection has never been written
//!
//! All of them become a dense list of non-null entries. Object entries are
//! ordered by numeric key and get their key copied into a missing `id` field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::shared::entity::IntoEntityId;

/// Flatten a raw collection payload into its non-null entries
pub fn normalize_payload(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.into_iter().filter(|v| !v.is_null()).collect(),
        Value::Object(map) => {
            let mut entries: Vec<(Option<u64>, String, Value)> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(key, value)| ((&key).into_entity_id(), key, value))
                .collect();
            // numeric keys first, in numeric order
            entries.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.1.cmp(&b.1),
            });
            entries
                .into_iter()
                .map(|(id, _, mut value)| {
                    if let (Some(id), Value::Object(fields)) = (id, &mut value) {
                        fields.entry("id").or_insert_with(|| Value::from(id));
                    }
                    value
                })
                .collect()
        }
        Value::Null => Vec::new(),
        other => {
            tracing::debug!("Ignoring scalar collection payload: {}", other);
            Vec::new()
        }
    }
}

/// Decode entries into `T`, skipping those that do not fit
pub fn decode_entities<T: DeserializeOwned>(entries: Vec<Value>, context: &str) -> Vec<T> {
    let total = entries.len();
    let decoded: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("[SYNC] {}: skipping malformed entry: {}", context, e);
                None
            }
        })
        .collect();
    if decoded.len() != total {
        tracing::warn!("[SYNC] {}: kept {} of {} entries", context, decoded.len(), total);
    }
    decoded
}
