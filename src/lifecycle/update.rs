//! Merged partial-update record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Bottle, BottleEdit, GiftInfo, SpiritType, Stage, StatusHistoryEntry};

/// Partial bottle record: every field optional, `None` meaning unchanged.
///
/// A lifecycle transition produces one of these carrying only the two
/// changed counters, the derived status and the new history array. Direct
/// field edits produce one via [`BottleUpdate::from_edit`]; the consistency
/// sweep via [`BottleUpdate::status_only`]. Serialization skips absent
/// fields, so the persistence collaborator sees a partial document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BottleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gifted: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Stage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<StatusHistoryEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SpiritType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_info: Option<GiftInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BottleUpdate {
    /// Status-only repair update, as issued by the consistency sweep.
    pub fn status_only(status: Stage) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Update from direct field edits. Counters, status and history are not
    /// expressible through [`BottleEdit`], so this path cannot drift them.
    pub fn from_edit(edit: BottleEdit) -> Self {
        Self {
            name: edit.name,
            kind: edit.kind,
            year: edit.year,
            location: edit.location,
            purchase_price: edit.purchase_price,
            estimated_value: edit.estimated_value,
            notes: edit.notes,
            comments: edit.comments,
            photo: edit.photo,
            rating: edit.rating,
            favorite: edit.favorite,
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Set the counter field for a stage.
    pub(crate) fn set_counter(&mut self, stage: Stage, value: u32) {
        match stage {
            Stage::InStock => self.in_stock = Some(value),
            Stage::Opened => self.opened = Some(value),
            Stage::Consumed => self.consumed = Some(value),
            Stage::Gifted => self.gifted = Some(value),
        }
    }

    /// True if the update touches any of the four counters.
    pub fn touches_counters(&self) -> bool {
        self.in_stock.is_some()
            || self.opened.is_some()
            || self.consumed.is_some()
            || self.gifted.is_some()
    }

    /// Merge the update into a bottle, field by field.
    pub fn apply_to(&self, bottle: &mut Bottle) {
        if let Some(value) = self.in_stock {
            bottle.counters.in_stock = value;
        }
        if let Some(value) = self.opened {
            bottle.counters.opened = value;
        }
        if let Some(value) = self.consumed {
            bottle.counters.consumed = value;
        }
        if let Some(value) = self.gifted {
            bottle.counters.gifted = value;
        }
        if let Some(status) = self.status {
            bottle.status = status;
        }
        if let Some(ref history) = self.history {
            bottle.history = history.clone();
        }
        if let Some(ref name) = self.name {
            bottle.name = name.clone();
        }
        if let Some(kind) = self.kind {
            bottle.kind = kind;
        }
        if let Some(year) = self.year {
            bottle.year = Some(year);
        }
        if let Some(ref location) = self.location {
            bottle.location = location.clone();
        }
        if let Some(price) = self.purchase_price {
            bottle.purchase_price = Some(price);
        }
        if let Some(value) = self.estimated_value {
            bottle.estimated_value = Some(value);
        }
        if let Some(ref notes) = self.notes {
            bottle.notes = Some(notes.clone());
        }
        if let Some(ref comments) = self.comments {
            bottle.comments = Some(comments.clone());
        }
        if let Some(ref gift_info) = self.gift_info {
            bottle.gift_info = Some(gift_info.clone());
        }
        if let Some(ref photo) = self.photo {
            bottle.photo = Some(photo.clone());
        }
        if let Some(rating) = self.rating {
            bottle.rating = Some(rating);
        }
        if let Some(favorite) = self.favorite {
            bottle.favorite = favorite;
        }
        if let Some(updated_at) = self.updated_at {
            bottle.updated_at = Some(updated_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BottleId, NewBottle};

    #[test]
    fn test_partial_serialization_skips_absent_fields() {
        let mut update = BottleUpdate::status_only(Stage::Opened);
        update.opened = Some(2);

        let json = serde_json::to_value(&update).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(json["status"], "opened");
        assert_eq!(json["opened"], 2);
    }

    #[test]
    fn test_edit_update_never_touches_counters() {
        let update = BottleUpdate::from_edit(BottleEdit {
            name: Some("Renamed".into()),
            rating: Some(4),
            ..Default::default()
        });

        assert!(!update.touches_counters());
        assert!(update.status.is_none());
        assert!(update.history.is_none());
    }

    #[test]
    fn test_apply_merges_only_set_fields() {
        let mut bottle = Bottle::create(
            BottleId("b1".into()),
            NewBottle::new("Ardbeg", SpiritType::Whisky, 4),
        );

        let mut update = BottleUpdate::default();
        update.in_stock = Some(2);
        update.opened = Some(2);
        update.status = Some(Stage::InStock);
        update.apply_to(&mut bottle);

        assert_eq!(bottle.counters.in_stock, 2);
        assert_eq!(bottle.counters.opened, 2);
        // Untouched fields keep their values.
        assert_eq!(bottle.counters.consumed, 0);
        assert_eq!(bottle.name, "Ardbeg");
    }
}
