//! Canonical status derivation.
//!
//! The status field is denormalized for query and display convenience; the
//! four counters are the ground truth. This module is the single authority
//! mapping counters to status. Every mutation path recomputes through here,
//! and the consistency sweep uses the same function to detect drift.

use crate::types::{QuantityCounters, Stage};

/// Derive the canonical status from the quantity counters.
///
/// Rules, in order:
/// 1. Any stock at all means `in_stock`, regardless of the other counters.
/// 2. Otherwise the stage with the largest counter wins, ties broken by the
///    fixed preference `opened > consumed > gifted`.
/// 3. All counters zero defaults to `in_stock`.
///
/// Total and idempotent: never fails, and re-deriving from unchanged
/// counters yields the same status.
pub fn derive_status(counters: &QuantityCounters) -> Stage {
    if counters.in_stock > 0 {
        return Stage::InStock;
    }

    let mut best = (Stage::Opened, counters.opened);
    for (stage, quantity) in [
        (Stage::Consumed, counters.consumed),
        (Stage::Gifted, counters.gifted),
    ] {
        // Strictly greater: on a tie the earlier stage keeps precedence.
        if quantity > best.1 {
            best = (stage, quantity);
        }
    }

    if best.1 > 0 {
        best.0
    } else {
        Stage::InStock
    }
}
