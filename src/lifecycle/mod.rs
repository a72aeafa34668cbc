//! Bottle lifecycle coordination.
//!
//! The coordinator is the single place transitions are computed: it resolves
//! the source stage, validates against the quantity ledger, derives the new
//! status and builds the history entry, then folds everything into one
//! [`BottleUpdate`], the exact payload handed to the persistence
//! collaborator. One transition, one logical write.
//!
//! The coordinator is pure. It reads the bottle, returns a delta, and never
//! touches shared state; merging the delta into the cache and persisting it
//! is [`crate::cellar::Cellar`]'s job.

mod coordinator;
mod update;

pub use coordinator::{transition, TransitionRequest};
pub use update::BottleUpdate;
