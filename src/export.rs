//! Flattened export projection.
//!
//! The export collaborator (spreadsheet emission) consumes one flat,
//! read-only row per bottle with human-readable labels. Building the rows is
//! part of the core data contract; writing the file is not.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::history;
use crate::types::{Bottle, Origin};

/// One spreadsheet row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub kind: String,
    pub year: Option<u16>,
    pub status: String,
    pub location: String,
    pub purchase_price: Option<Decimal>,
    pub estimated_value: Option<Decimal>,
    pub acquired_at: DateTime<Utc>,
    pub origin: String,
    /// Sender, for bottles received as gifts.
    pub gift_from: Option<String>,
    pub rating: Option<u8>,
    pub comments: Option<String>,
    pub favorite: bool,
    pub in_stock: u32,
    pub opened: u32,
    pub consumed: u32,
    pub gifted: u32,
    /// Deduplicated history length (what the display layer shows).
    pub history_entries: usize,
}

impl ExportRow {
    /// Flatten one bottle.
    pub fn from_bottle(bottle: &Bottle) -> Self {
        let gift_from = match bottle.origin {
            Origin::ReceivedAsGift => bottle
                .gift_info
                .as_ref()
                .and_then(|gift| gift.from.clone()),
            Origin::Purchase => None,
        };

        Self {
            name: bottle.name.clone(),
            kind: bottle.kind.label().to_string(),
            year: bottle.year,
            status: bottle.status.label().to_string(),
            location: bottle.location.clone(),
            purchase_price: bottle.purchase_price,
            estimated_value: bottle.estimated_value,
            acquired_at: bottle.acquired_at,
            origin: bottle.origin.label().to_string(),
            gift_from,
            rating: bottle.rating,
            comments: bottle.comments.clone(),
            favorite: bottle.favorite,
            in_stock: bottle.counters.in_stock,
            opened: bottle.counters.opened,
            consumed: bottle.counters.consumed,
            gifted: bottle.counters.gifted,
            history_entries: history::display_order(&bottle.history).len(),
        }
    }
}

/// Project every bottle into a row.
pub fn rows<'a>(bottles: impl IntoIterator<Item = &'a Bottle>) -> Vec<ExportRow> {
    bottles.into_iter().map(ExportRow::from_bottle).collect()
}
