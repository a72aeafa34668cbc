//! Event and subscription types.

use serde::{Deserialize, Serialize};

use crate::types::{BottleId, Stage};

/// Events emitted after committed cellar mutations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellarEvent {
    /// A bottle was added to the collection.
    BottleAdded { id: BottleId, name: String },

    /// A bottle changed (transition or field edit); carries the status
    /// after the change.
    BottleChanged { id: BottleId, status: Stage },

    /// A bottle was deleted.
    BottleDeleted { id: BottleId },

    /// The consistency sweep corrected a drifted status.
    StatusRepaired {
        id: BottleId,
        from: Stage,
        to: Stage,
    },
}

impl CellarEvent {
    /// The bottle the event concerns.
    pub fn bottle_id(&self) -> &BottleId {
        match self {
            CellarEvent::BottleAdded { id, .. }
            | CellarEvent::BottleChanged { id, .. }
            | CellarEvent::BottleDeleted { id }
            | CellarEvent::StatusRepaired { id, .. } => id,
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Only events for these bottles (None = all bottles).
    pub bottles: Option<Vec<BottleId>>,

    /// Include sweep repair events. Off by default: most views only care
    /// about user-visible mutations.
    pub include_repairs: bool,
}

impl EventFilter {
    /// Every mutation, repairs included.
    pub fn all() -> Self {
        Self {
            bottles: None,
            include_repairs: true,
        }
    }

    /// Mutations of a single bottle.
    pub fn bottle(id: BottleId) -> Self {
        Self {
            bottles: Some(vec![id]),
            include_repairs: true,
        }
    }

    pub(crate) fn matches(&self, event: &CellarEvent) -> bool {
        if matches!(event, CellarEvent::StatusRepaired { .. }) && !self.include_repairs {
            return false;
        }
        if let Some(ref bottles) = self.bottles {
            return bottles.contains(event.bottle_id());
        }
        true
    }
}

/// Unique identifier for a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Handle to a subscription.
pub struct EventHandle {
    pub id: SubscriberId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<CellarEvent>,
}

impl EventHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<CellarEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<CellarEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<CellarEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
