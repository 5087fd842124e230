//! Entity identity
//!
//! Every record kept in a remote collection carries a numeric `id` that is
//! unique inside its collection and never reused. This module defines the
//! [`Entity`] trait the stores and the remote adapter work against, and the
//! rules for turning loosely-typed identifiers into an [`EntityId`].
//!
//! # Identifier normalization
//!
//! IDs reach the queue from several places: typed values, JSON numbers read back
//! from the store and strings taken from object keys. [`IntoEntityId`] accepts
//! all of them and yields `None` for anything that is not a positive integer the
//! store can represent exactly:
//!
//! - unsigned and signed integers greater than zero
//! - floats that are integral and no larger than [`MAX_SAFE_FLOAT_ID`]
//! - decimal strings of such a number

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Numeric entity identifier
pub type EntityId = u64;

/// Largest integer a JSON float carries without loss (2^53 - 1)
pub const MAX_SAFE_FLOAT_ID: u64 = 9_007_199_254_740_991;

/// A record stored in a remote collection
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Short label used in log lines and error contexts
    const KIND: &'static str;

    /// The entity id, if one has been assigned
    fn id(&self) -> Option<EntityId>;

    /// Assign the entity id
    fn set_id(&mut self, id: EntityId);
}

/// Conversion into a validated [`EntityId`]
pub trait IntoEntityId {
    /// Returns `None` when the value is not a representable positive integer
    fn into_entity_id(self) -> Option<EntityId>;
}

impl IntoEntityId for u64 {
    fn into_entity_id(self) -> Option<EntityId> {
        (self > 0).then_some(self)
    }
}

impl IntoEntityId for u32 {
    fn into_entity_id(self) -> Option<EntityId> {
        u64::from(self).into_entity_id()
    }
}

impl IntoEntityId for i64 {
    fn into_entity_id(self) -> Option<EntityId> {
        u64::try_from(self).ok().and_then(IntoEntityId::into_entity_id)
    }
}

impl IntoEntityId for i32 {
    fn into_entity_id(self) -> Option<EntityId> {
        i64::from(self).into_entity_id()
    }
}

impl IntoEntityId for f64 {
    fn into_entity_id(self) -> Option<EntityId> {
        if !self.is_finite() || self.fract() != 0.0 || self < 1.0 {
            return None;
        }
        if self > MAX_SAFE_FLOAT_ID as f64 {
            return None;
        }
        Some(self as u64)
    }
}

impl IntoEntityId for &str {
    fn into_entity_id(self) -> Option<EntityId> {
        let trimmed = self.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u64>().ok().and_then(IntoEntityId::into_entity_id)
    }
}

impl IntoEntityId for &String {
    fn into_entity_id(self) -> Option<EntityId> {
        self.as_str().into_entity_id()
    }
}

impl IntoEntityId for &Value {
    fn into_entity_id(self) -> Option<EntityId> {
        match self {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    u.into_entity_id()
                } else if let Some(i) = n.as_i64() {
                    i.into_entity_id()
                } else {
                    n.as_f64().and_then(IntoEntityId::into_entity_id)
                }
            }
            Value::String(s) => s.as_str().into_entity_id(),
            _ => None,
        }
    }
}

impl<T: IntoEntityId> IntoEntityId for Option<T> {
    fn into_entity_id(self) -> Option<EntityId> {
        self.and_then(IntoEntityId::into_entity_id)
    }
}
