//! Aggregate collection statistics.

use rust_decimal::Decimal;

use crate::types::{Bottle, Stage};

/// Bottle count and unit count for one slice of the collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageBreakdown {
    /// Bottles with at least one unit in the stage.
    pub bottles: usize,

    /// Total units in the stage across the collection.
    pub units: u64,
}

/// Collection-wide aggregates for the dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InventoryStats {
    /// All bottles; units counted across every stage.
    pub total: StageBreakdown,

    pub in_stock: StageBreakdown,
    pub opened: StageBreakdown,
    pub consumed: StageBreakdown,
    pub gifted: StageBreakdown,

    /// Sum of purchase prices over bottles that have one.
    pub purchase_total: Decimal,

    /// Sum of estimated values over bottles that have one.
    pub estimated_total: Decimal,

    pub favorites: usize,
}

impl InventoryStats {
    /// Aggregate over a set of bottles.
    pub fn collect<'a>(bottles: impl IntoIterator<Item = &'a Bottle>) -> Self {
        let mut stats = Self::default();

        for bottle in bottles {
            stats.total.bottles += 1;
            stats.total.units += bottle.counters.total();

            for (stage, slot) in [
                (Stage::InStock, &mut stats.in_stock),
                (Stage::Opened, &mut stats.opened),
                (Stage::Consumed, &mut stats.consumed),
                (Stage::Gifted, &mut stats.gifted),
            ] {
                let units = bottle.counters.get(stage);
                if units > 0 {
                    slot.bottles += 1;
                    slot.units += units as u64;
                }
            }

            if let Some(price) = bottle.purchase_price {
                stats.purchase_total += price;
            }
            if let Some(value) = bottle.estimated_value {
                stats.estimated_total += value;
            }
            if bottle.favorite {
                stats.favorites += 1;
            }
        }

        stats
    }
}
