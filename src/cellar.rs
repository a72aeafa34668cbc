//! Main Cellar struct tying all components together.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::{CellarError, Result};
use crate::events::{CellarEvent, EventFilter, EventHandle, EventHub, SubscriberId};
use crate::export::{self, ExportRow};
use crate::lifecycle::{self, BottleUpdate, TransitionRequest};
use crate::persistence::BottleRepository;
use crate::stats::InventoryStats;
use crate::sweep::{self, SweepReport};
use crate::types::{Bottle, BottleEdit, BottleId, NewBottle, OwnerId};

/// Cellar configuration.
#[derive(Clone, Debug)]
pub struct CellarConfig {
    /// Run the consistency sweep after every load.
    pub sweep_on_load: bool,

    /// Per-subscriber event buffer size.
    pub event_buffer: usize,
}

impl Default for CellarConfig {
    fn default() -> Self {
        Self {
            sweep_on_load: true,
            event_buffer: 256,
        }
    }
}

/// The application-state object of the inventory.
///
/// Holds the in-memory mirror of the collection and coordinates every
/// mutation path: lifecycle transitions, direct field edits, creation,
/// deletion and the consistency sweep. All state changes follow
/// write-then-reflect: the persistence collaborator commits first, and
/// only then is the cache updated and an event emitted. A failed write
/// therefore leaves the cache at the pre-mutation snapshot.
pub struct Cellar<R: BottleRepository> {
    /// Persistence collaborator.
    repo: R,

    config: CellarConfig,

    /// In-memory mirror of the collection.
    bottles: RwLock<HashMap<BottleId, Bottle>>,

    /// Change notifications for UI layers.
    events: EventHub,
}

impl<R: BottleRepository> Cellar<R> {
    /// Create a cellar over a repository with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, CellarConfig::default())
    }

    /// Create a cellar with explicit configuration.
    pub fn with_config(repo: R, config: CellarConfig) -> Self {
        let events = EventHub::new(config.event_buffer);
        Self {
            repo,
            config,
            bottles: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Load the owner's collection into the cache, replacing any previous
    /// contents. Runs the consistency sweep afterwards when configured.
    pub fn load(&self, owner: &OwnerId) -> Result<usize> {
        let bottles = self.repo.list(owner)?;
        let count = bottles.len();

        {
            let mut cache = self.bottles.write();
            cache.clear();
            for bottle in bottles {
                cache.insert(bottle.id.clone(), bottle);
            }
        }

        tracing::info!(owner = %owner, bottles = count, "loaded collection");

        if self.config.sweep_on_load {
            let report = self.sweep()?;
            if !report.is_clean() {
                tracing::info!(repaired = report.repaired.len(), "post-load sweep repaired drift");
            }
        }

        Ok(count)
    }

    /// Add a bottle to the collection.
    ///
    /// Seeds counters, status and the first history entry, persists the
    /// document, then mirrors it into the cache.
    pub fn add(&self, owner: &OwnerId, input: NewBottle) -> Result<Bottle> {
        let draft = Bottle::create(BottleId(String::new()), input);
        let id = self.repo.create(owner, &draft)?;

        let mut bottle = draft;
        bottle.id = id.clone();
        self.bottles.write().insert(id.clone(), bottle.clone());

        self.events.broadcast(CellarEvent::BottleAdded {
            id,
            name: bottle.name.clone(),
        });

        Ok(bottle)
    }

    /// Snapshot of one bottle.
    pub fn bottle(&self, id: &BottleId) -> Result<Bottle> {
        self.bottles
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| CellarError::BottleNotFound(id.clone()))
    }

    /// Snapshot of the whole collection (unordered).
    pub fn bottles(&self) -> Vec<Bottle> {
        self.bottles.read().values().cloned().collect()
    }

    /// Run a lifecycle transition end-to-end.
    ///
    /// Validation and computation are pure and happen before any side
    /// effect; the single resulting [`BottleUpdate`] is committed to the
    /// repository and only then merged into the cache. Errors propagate
    /// untouched with no partial mutation anywhere.
    pub fn transition(&self, id: &BottleId, request: TransitionRequest) -> Result<Bottle> {
        let snapshot = self.bottle(id)?;
        let update = lifecycle::transition(&snapshot, request)?;

        self.repo.update(id, &update)?;

        let bottle = self.reflect(id, snapshot, &update);
        self.events.broadcast(CellarEvent::BottleChanged {
            id: id.clone(),
            status: bottle.status,
        });

        Ok(bottle)
    }

    /// Apply direct field edits. Counters, status and history are not
    /// expressible here and stay untouched.
    pub fn edit(&self, id: &BottleId, edit: BottleEdit) -> Result<Bottle> {
        let snapshot = self.bottle(id)?;
        let update = BottleUpdate::from_edit(edit);

        self.repo.update(id, &update)?;

        let bottle = self.reflect(id, snapshot, &update);
        self.events.broadcast(CellarEvent::BottleChanged {
            id: id.clone(),
            status: bottle.status,
        });

        Ok(bottle)
    }

    /// Flip the favorite flag; returns the new value.
    pub fn toggle_favorite(&self, id: &BottleId) -> Result<bool> {
        let favorite = !self.bottle(id)?.favorite;
        let edit = BottleEdit {
            favorite: Some(favorite),
            ..Default::default()
        };
        self.edit(id, edit)?;
        Ok(favorite)
    }

    /// Delete a bottle permanently.
    pub fn delete(&self, id: &BottleId) -> Result<()> {
        self.repo.delete(id)?;
        self.bottles.write().remove(id);
        self.events
            .broadcast(CellarEvent::BottleDeleted { id: id.clone() });
        Ok(())
    }

    /// Run the consistency sweep over the cached collection.
    ///
    /// Issues one status-only repair write per drifted bottle; counters and
    /// history are never touched. Idempotent: a second run with no
    /// intervening transitions issues zero writes.
    pub fn sweep(&self) -> Result<SweepReport> {
        let snapshot = self.bottles();
        let plan = sweep::plan_repairs(snapshot.iter());

        let mut report = SweepReport {
            examined: snapshot.len(),
            repaired: Vec::with_capacity(plan.len()),
        };

        for (id, status) in plan {
            let previous = match snapshot.iter().find(|bottle| bottle.id == id) {
                Some(bottle) => bottle.status,
                None => continue,
            };

            self.repo.update(&id, &BottleUpdate::status_only(status))?;

            if let Some(bottle) = self.bottles.write().get_mut(&id) {
                bottle.status = status;
            }

            tracing::warn!(bottle = %id, from = %previous, to = %status, "repaired drifted status");
            self.events.broadcast(CellarEvent::StatusRepaired {
                id: id.clone(),
                from: previous,
                to: status,
            });
            report.repaired.push((id, status));
        }

        Ok(report)
    }

    /// Aggregate statistics over the cached collection.
    pub fn stats(&self) -> InventoryStats {
        let cache = self.bottles.read();
        InventoryStats::collect(cache.values())
    }

    /// Flattened export rows over the cached collection.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let cache = self.bottles.read();
        export::rows(cache.values())
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self, filter: EventFilter) -> EventHandle {
        self.events.subscribe(filter)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.events.unsubscribe(id);
    }

    /// Merge a committed update into the cache and return the result.
    fn reflect(&self, id: &BottleId, snapshot: Bottle, update: &BottleUpdate) -> Bottle {
        let mut cache = self.bottles.write();
        let bottle = cache.entry(id.clone()).or_insert(snapshot);
        update.apply_to(bottle);
        bottle.clone()
    }
}
