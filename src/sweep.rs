//! Consistency sweep: status drift detection.
//!
//! Status is denormalized; partial writes or legacy data can leave it out of
//! step with the counters. The sweep re-derives every bottle's status and
//! plans a status-only repair for each mismatch. Counters and history are
//! never touched. Applying the repairs (one persistence write per drifted
//! bottle) is [`crate::cellar::Cellar::sweep`]'s job.

use crate::status::derive_status;
use crate::types::{Bottle, BottleId, Stage};

/// Outcome of one sweep run.
#[derive(Clone, Debug, Default)]
pub struct SweepReport {
    /// Bottles examined.
    pub examined: usize,

    /// Bottles whose stored status was corrected, with the repaired value.
    pub repaired: Vec<(BottleId, Stage)>,
}

impl SweepReport {
    /// True if no bottle needed repair.
    pub fn is_clean(&self) -> bool {
        self.repaired.is_empty()
    }
}

/// Find every bottle whose stored status disagrees with the derived one.
///
/// Pure and idempotent: running it twice over unchanged bottles yields the
/// same plan, and an applied plan makes the next run empty.
pub fn plan_repairs<'a>(bottles: impl IntoIterator<Item = &'a Bottle>) -> Vec<(BottleId, Stage)> {
    bottles
        .into_iter()
        .filter_map(|bottle| {
            let derived = derive_status(&bottle.counters);
            if bottle.status != derived {
                Some((bottle.id.clone(), derived))
            } else {
                None
            }
        })
        .collect()
}
