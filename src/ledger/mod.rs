//! Quantity ledger: pure counter arithmetic for lifecycle transitions.
//!
//! A transition moves units between exactly two counters; the ledger
//! validates the request against the defined transition table and the
//! available source quantity, then returns the new counters. No side
//! effects; persistence and history belong to the coordinator.

mod transitions;

pub use transitions::{apply, is_defined, source_for};
