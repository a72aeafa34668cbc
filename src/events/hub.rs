//! Event hub broadcasting cellar events to subscribers.

use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{CellarEvent, EventFilter, EventHandle, SubscriberId};

/// Internal subscriber state.
struct Subscriber {
    filter: EventFilter,
    sender: Sender<CellarEvent>,
}

impl Subscriber {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (the subscriber will be dropped).
    fn try_send(&self, event: CellarEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }
}

/// Broadcasts cellar events to filtered subscribers.
pub struct EventHub {
    subscribers: RwLock<HashMap<SubscriberId, Subscriber>>,
    next_id: AtomicU64,
    /// Per-subscriber channel capacity.
    buffer_size: usize,
}

impl EventHub {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer_size,
        }
    }

    /// Register a subscriber and return its receiving handle.
    pub fn subscribe(&self, filter: EventFilter) -> EventHandle {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(self.buffer_size);

        self.subscribers
            .write()
            .insert(id, Subscriber { filter, sender });

        EventHandle { id, receiver }
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().remove(&id);
    }

    /// Active subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver an event to every matching subscriber. Subscribers whose
    /// buffer is full are dropped.
    pub fn broadcast(&self, event: CellarEvent) {
        let mut to_remove = Vec::new();

        {
            let subscribers = self.subscribers.read();
            for (id, subscriber) in subscribers.iter() {
                if subscriber.filter.matches(&event) && !subscriber.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in to_remove {
                subscribers.remove(&id);
                tracing::warn!(subscriber = id.0, "dropped slow event subscriber");
            }
        }
    }
}
