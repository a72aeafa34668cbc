//! Transition table and counter application.

use crate::error::{CellarError, Result};
use crate::types::{QuantityCounters, Stage};

/// Whether `(from, to)` is a defined transition.
///
/// The table:
///
/// | Transition          | from       | to         |
/// |---------------------|------------|------------|
/// | Restock             | (none)     | `in_stock` |
/// | Open                | `in_stock` | `opened`   |
/// | Consume from stock  | `in_stock` | `consumed` |
/// | Consume from opened | `opened`   | `consumed` |
/// | Gift                | `in_stock` | `gifted`   |
pub fn is_defined(from: Option<Stage>, to: Stage) -> bool {
    matches!(
        (from, to),
        (None, Stage::InStock)
            | (Some(Stage::InStock), Stage::Opened)
            | (Some(Stage::InStock), Stage::Consumed)
            | (Some(Stage::Opened), Stage::Consumed)
            | (Some(Stage::InStock), Stage::Gifted)
    )
}

/// Default source stage for a target when the caller does not specify one.
///
/// Open and gift always draw from stock; consume draws from stock unless the
/// caller explicitly selects `opened`. Restock has no source.
pub fn source_for(to: Stage) -> Option<Stage> {
    match to {
        Stage::InStock => None,
        Stage::Opened | Stage::Consumed | Stage::Gifted => Some(Stage::InStock),
    }
}

/// Apply a transition of `quantity` units to the counters.
///
/// Validates before computing: zero quantity and undefined stage pairs fail
/// with [`CellarError::InvalidTransition`]; a source counter smaller than
/// the request fails with [`CellarError::InsufficientQuantity`] carrying the
/// requested and available amounts. On success the returned counters differ
/// from the input in exactly the source and target (or only `in_stock` for
/// a restock).
pub fn apply(
    counters: QuantityCounters,
    from: Option<Stage>,
    to: Stage,
    quantity: u32,
) -> Result<QuantityCounters> {
    if quantity == 0 {
        return Err(CellarError::InvalidTransition(
            "quantity must be positive".to_string(),
        ));
    }

    if !is_defined(from, to) {
        return Err(CellarError::InvalidTransition(match from {
            Some(from) => format!("no transition from {} to {}", from, to),
            None => format!("no sourceless transition to {}", to),
        }));
    }

    let mut next = counters;

    if let Some(from) = from {
        let available = counters.get(from);
        if quantity > available {
            return Err(CellarError::InsufficientQuantity {
                requested: quantity,
                available,
            });
        }
        // The clamp is unreachable: quantity <= available was checked above.
        next.set(from, available.saturating_sub(quantity));
    }

    next.set(to, counters.get(to) + quantity);

    Ok(next)
}
