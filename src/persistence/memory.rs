//! In-memory reference repository.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::error::{CellarError, Result};
use crate::lifecycle::BottleUpdate;
use crate::types::{Bottle, BottleId, OwnerId};

use super::repository::{encode_document, BottleRepository};

/// Map-backed repository used by the shell before a cloud backend is
/// configured, and by the test suite.
///
/// Documents are validated through [`encode_document`] before any write,
/// like a real document store would. The `offline` switch makes every
/// operation fail with [`CellarError::PersistenceUnavailable`], for
/// exercising failure paths.
#[derive(Default)]
pub struct MemoryRepository {
    bottles: RwLock<HashMap<BottleId, (OwnerId, Bottle)>>,
    offline: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend becoming unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored bottles (all owners).
    pub fn len(&self) -> usize {
        self.bottles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bottles.read().is_empty()
    }

    /// Insert a bottle verbatim, bypassing validation. Test seam for
    /// simulating legacy documents (drifted status, duplicate history rows).
    pub fn insert_raw(&self, owner: OwnerId, bottle: Bottle) {
        self.bottles
            .write()
            .insert(bottle.id.clone(), (owner, bottle));
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CellarError::PersistenceUnavailable(
                "memory repository is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl BottleRepository for MemoryRepository {
    fn get(&self, id: &BottleId) -> Result<Bottle> {
        self.check_online()?;
        self.bottles
            .read()
            .get(id)
            .map(|(_, bottle)| bottle.clone())
            .ok_or_else(|| CellarError::BottleNotFound(id.clone()))
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Bottle>> {
        self.check_online()?;
        Ok(self
            .bottles
            .read()
            .values()
            .filter(|(stored_owner, _)| stored_owner == owner)
            .map(|(_, bottle)| bottle.clone())
            .collect())
    }

    fn create(&self, owner: &OwnerId, bottle: &Bottle) -> Result<BottleId> {
        self.check_online()?;
        encode_document(bottle)?;

        let id = BottleId(Uuid::new_v4().to_string());
        let mut stored = bottle.clone();
        stored.id = id.clone();
        self.bottles
            .write()
            .insert(id.clone(), (owner.clone(), stored));

        tracing::debug!(bottle = %id, owner = %owner, "created document");
        Ok(id)
    }

    fn update(&self, id: &BottleId, update: &BottleUpdate) -> Result<()> {
        self.check_online()?;
        encode_document(update)?;

        let mut bottles = self.bottles.write();
        let (_, bottle) = bottles
            .get_mut(id)
            .ok_or_else(|| CellarError::BottleNotFound(id.clone()))?;
        update.apply_to(bottle);

        tracing::debug!(bottle = %id, "merged partial update");
        Ok(())
    }

    fn delete(&self, id: &BottleId) -> Result<()> {
        self.check_online()?;
        self.bottles
            .write()
            .remove(id)
            .ok_or_else(|| CellarError::BottleNotFound(id.clone()))?;
        Ok(())
    }
}
