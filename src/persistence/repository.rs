//! Repository trait and payload validation.

use serde::Serialize;

use crate::error::{CellarError, Result};
use crate::lifecycle::BottleUpdate;
use crate::types::{Bottle, BottleId, OwnerId};

/// Per-document storage for bottles.
///
/// `update` accepts partial records: implementations merge field by field
/// and must not require full-document replacement. Implementations signal
/// [`CellarError::PersistenceUnavailable`] when the backend is unreachable
/// or misconfigured and [`CellarError::Serialization`] for payloads they
/// cannot represent; retry policy, if any, belongs to the caller.
pub trait BottleRepository: Send + Sync {
    /// Fetch one bottle.
    fn get(&self, id: &BottleId) -> Result<Bottle>;

    /// Fetch all bottles belonging to an owner.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Bottle>>;

    /// Store a new bottle and return its assigned id. The id on the passed
    /// record is a placeholder and is ignored.
    fn create(&self, owner: &OwnerId, bottle: &Bottle) -> Result<BottleId>;

    /// Merge a partial update into a stored bottle.
    fn update(&self, id: &BottleId, update: &BottleUpdate) -> Result<()>;

    /// Remove a bottle permanently.
    fn delete(&self, id: &BottleId) -> Result<()>;
}

/// Validate that a payload is representable as a plain JSON document.
///
/// Mirrors the write-side guard of document stores that reject unsupported
/// nested values. Rust's ownership rules out circular references, but a
/// custom `Serialize` impl or a non-finite float still fails here, before
/// the write is attempted.
pub fn encode_document<T: Serialize>(payload: &T) -> Result<serde_json::Value> {
    let value = serde_json::to_value(payload)?;
    if !value.is_object() {
        return Err(CellarError::Serialization(
            "document payload must serialize to an object".to_string(),
        ));
    }
    Ok(value)
}
