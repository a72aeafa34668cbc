//! # Cellar
//!
//! Lifecycle and quantity reconciliation core for a personal
//! bottle-collection inventory.
//!
//! ## Core Concepts
//!
//! - **Counters**: Four independent per-stage unit counts
//!   (`in_stock`/`opened`/`consumed`/`gifted`), the ground truth
//! - **Status**: Single canonical stage derived from the counters
//! - **Transitions**: Unit moves between two counters, validated by the
//!   quantity ledger and recorded in an append-only history
//! - **Sweep**: Background reconciliation correcting status drift
//!
//! ## Example
//!
//! ```ignore
//! use cellar::{Cellar, MemoryRepository, NewBottle, OwnerId, SpiritType, TransitionRequest};
//!
//! let cellar = Cellar::new(MemoryRepository::new());
//! let owner = OwnerId("me".into());
//!
//! // Record a bottle
//! let bottle = cellar.add(&owner, NewBottle::new("Talisker 10", SpiritType::Whisky, 6))?;
//!
//! // Open two units; the bottle stays in stock while any stock remains
//! let bottle = cellar.transition(&bottle.id, TransitionRequest::open(2))?;
//! assert_eq!(bottle.counters.opened, 2);
//!
//! // Gift one from stock
//! cellar.transition(&bottle.id, TransitionRequest::gift(1, "Margaux"))?;
//! ```

pub mod cellar;
pub mod error;
pub mod events;
pub mod export;
pub mod history;
pub mod ledger;
pub mod lifecycle;
pub mod persistence;
pub mod stats;
pub mod status;
pub mod sweep;
pub mod types;

// Re-exports
pub use cellar::{Cellar, CellarConfig};
pub use error::{CellarError, Result};
pub use events::{CellarEvent, EventFilter, EventHandle, EventHub, SubscriberId};
pub use export::ExportRow;
pub use lifecycle::{transition, BottleUpdate, TransitionRequest};
pub use persistence::{BottleRepository, MemoryRepository};
pub use stats::{InventoryStats, StageBreakdown};
pub use status::derive_status;
pub use sweep::SweepReport;
pub use types::*;
