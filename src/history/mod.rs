//! Append-only status history.
//!
//! Entries are stored in insertion order. The builder deduplicates on the
//! write side; [`display_order`] guards the read side as well, so legacy
//! rows that slipped past an older writer still render once.

mod builder;

pub use builder::{append_entry, display_order};
