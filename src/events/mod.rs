//! In-process change notifications.
//!
//! UI layers mirror the cellar cache reactively: they subscribe here and
//! receive an event after each committed mutation (additions, updates,
//! deletions and sweep repairs). Delivery is best-effort over bounded
//! channels; a subscriber that stops draining its channel is dropped rather
//! than allowed to block writers.

mod hub;
mod types;

pub use hub::EventHub;
pub use types::{CellarEvent, EventFilter, EventHandle, SubscriberId};
