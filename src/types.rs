//! Core types for the cellar inventory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a bottle (assigned by the persistence collaborator).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BottleId(pub String);

impl fmt::Debug for BottleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BottleId({})", self.0)
    }
}

impl fmt::Display for BottleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the collection owner.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a history entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage a unit of a bottle occupies.
///
/// Doubles as the derived status value: the canonical status of a bottle is
/// always one of the four stages, computed from the counters by
/// [`crate::status::derive_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InStock,
    Opened,
    Consumed,
    Gifted,
}

impl Stage {
    /// All stages, in counter order.
    pub const ALL: [Stage; 4] = [Stage::InStock, Stage::Opened, Stage::Consumed, Stage::Gifted];

    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::InStock => "In stock",
            Stage::Opened => "Opened",
            Stage::Consumed => "Finished",
            Stage::Gifted => "Gifted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::InStock => "in_stock",
            Stage::Opened => "opened",
            Stage::Consumed => "consumed",
            Stage::Gifted => "gifted",
        };
        write!(f, "{}", s)
    }
}

/// Spirit and wine categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiritType {
    Rum,
    Whisky,
    Gin,
    Vodka,
    Tequila,
    Cognac,
    Armagnac,
    Calvados,
    EauDeVie,
    Absinthe,
    Liqueur,
    Pastis,
    Schnapps,
    Grappa,
    Chartreuse,
    RedWine,
    WhiteWine,
    RoseWine,
    SparklingWine,
    Champagne,
    Prosecco,
    Cava,
    Beer,
    Cider,
    Mead,
    Sake,
    Bitter,
    Ratafia,
    Limoncello,
}

impl SpiritType {
    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            SpiritType::Rum => "Rum",
            SpiritType::Whisky => "Whisky",
            SpiritType::Gin => "Gin",
            SpiritType::Vodka => "Vodka",
            SpiritType::Tequila => "Tequila",
            SpiritType::Cognac => "Cognac",
            SpiritType::Armagnac => "Armagnac",
            SpiritType::Calvados => "Calvados",
            SpiritType::EauDeVie => "Eau de vie",
            SpiritType::Absinthe => "Absinthe",
            SpiritType::Liqueur => "Liqueur",
            SpiritType::Pastis => "Pastis",
            SpiritType::Schnapps => "Schnapps",
            SpiritType::Grappa => "Grappa",
            SpiritType::Chartreuse => "Chartreuse",
            SpiritType::RedWine => "Red wine",
            SpiritType::WhiteWine => "White wine",
            SpiritType::RoseWine => "Rosé wine",
            SpiritType::SparklingWine => "Sparkling wine",
            SpiritType::Champagne => "Champagne",
            SpiritType::Prosecco => "Prosecco",
            SpiritType::Cava => "Cava",
            SpiritType::Beer => "Beer",
            SpiritType::Cider => "Cider",
            SpiritType::Mead => "Mead",
            SpiritType::Sake => "Sake",
            SpiritType::Bitter => "Bitter",
            SpiritType::Ratafia => "Ratafia",
            SpiritType::Limoncello => "Limoncello",
        }
    }
}

/// How a bottle entered the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Purchase,
    ReceivedAsGift,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Purchase => "Purchase",
            Origin::ReceivedAsGift => "Received as gift",
        }
    }
}

/// Gift metadata attached to a bottle or a history entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GiftInfo {
    /// Who the bottle came from (acquisition side).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Who the bottle went to (gift transition side).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl GiftInfo {
    /// Gift info for an outgoing gift.
    pub fn to_recipient(recipient: impl Into<String>) -> Self {
        Self {
            from: None,
            to: Some(recipient.into()),
            date: None,
        }
    }
}

/// Per-stage quantity counters of a bottle.
///
/// All counters are independent non-negative unit counts. A lifecycle
/// transition moves units between exactly two counters (restock only
/// increases `in_stock`); units are never duplicated or destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityCounters {
    pub in_stock: u32,
    pub opened: u32,
    pub consumed: u32,
    pub gifted: u32,
}

impl QuantityCounters {
    /// Counters for a freshly acquired bottle.
    pub fn with_stock(in_stock: u32) -> Self {
        Self {
            in_stock,
            ..Default::default()
        }
    }

    /// Counter value for a stage.
    pub fn get(&self, stage: Stage) -> u32 {
        match stage {
            Stage::InStock => self.in_stock,
            Stage::Opened => self.opened,
            Stage::Consumed => self.consumed,
            Stage::Gifted => self.gifted,
        }
    }

    /// Set the counter for a stage.
    pub fn set(&mut self, stage: Stage, value: u32) {
        match stage {
            Stage::InStock => self.in_stock = value,
            Stage::Opened => self.opened = value,
            Stage::Consumed => self.consumed = value,
            Stage::Gifted => self.gifted = value,
        }
    }

    /// Sum of all four counters.
    pub fn total(&self) -> u64 {
        self.in_stock as u64 + self.opened as u64 + self.consumed as u64 + self.gifted as u64
    }
}

/// Immutable record of one lifecycle transition.
///
/// `new_status` is the transition's target stage (the action taken), not the
/// derived status of the bottle afterwards: opening 2 of 6 units records an
/// `opened` entry while the bottle itself stays `in_stock`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: EntryId,

    pub at: DateTime<Utc>,

    pub new_status: Stage,

    /// Derived status of the bottle before the transition.
    /// `None` only for the creation seed entry.
    pub previous_status: Option<Stage>,

    /// Units moved by the transition.
    pub quantity: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_info: Option<GiftInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl StatusHistoryEntry {
    /// Two entries are duplicates iff they share timestamp, target status
    /// and quantity. Guards against duplicate submissions from the UI.
    pub fn duplicates(&self, other: &StatusHistoryEntry) -> bool {
        self.at == other.at && self.new_status == other.new_status && self.quantity == other.quantity
    }
}

/// One inventory line item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
    pub id: BottleId,

    pub name: String,

    pub kind: SpiritType,

    /// Per-stage unit counters.
    pub counters: QuantityCounters,

    /// Canonical status, derived from the counters.
    pub status: Stage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// Reference to a storage location entity.
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    pub origin: Origin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_info: Option<GiftInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Immutable once set.
    pub acquired_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// 1-5 star rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    #[serde(default)]
    pub favorite: bool,

    /// Append-only transition log, in insertion order.
    #[serde(default)]
    pub history: Vec<StatusHistoryEntry>,
}

/// Input for creating a new bottle (before an id is assigned).
#[derive(Clone, Debug)]
pub struct NewBottle {
    pub name: String,
    pub kind: SpiritType,
    pub quantity: u32,
    pub year: Option<u16>,
    pub location: String,
    pub purchase_price: Option<Decimal>,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub comments: Option<String>,
    pub origin: Origin,
    pub gift_info: Option<GiftInfo>,
    pub photo: Option<String>,
    pub acquired_at: Option<DateTime<Utc>>,
    pub rating: Option<u8>,
    pub favorite: bool,
}

impl NewBottle {
    /// Minimal purchase input; remaining fields via struct update.
    pub fn new(name: impl Into<String>, kind: SpiritType, quantity: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            quantity,
            year: None,
            location: String::new(),
            purchase_price: None,
            estimated_value: None,
            notes: None,
            comments: None,
            origin: Origin::Purchase,
            gift_info: None,
            photo: None,
            acquired_at: None,
            rating: None,
            favorite: false,
        }
    }
}

impl Bottle {
    /// Build a bottle from creation input.
    ///
    /// Seeds `in_stock` with the acquired quantity, derives the initial
    /// status and records the seed history entry (`previous_status = None`).
    pub fn create(id: BottleId, input: NewBottle) -> Self {
        let acquired_at = input.acquired_at.unwrap_or_else(Utc::now);
        let counters = QuantityCounters::with_stock(input.quantity);
        let seed = StatusHistoryEntry {
            id: EntryId::generate(),
            at: acquired_at,
            new_status: Stage::InStock,
            previous_status: None,
            quantity: input.quantity,
            gift_info: None,
            rating: None,
            comments: None,
        };

        Self {
            id,
            name: input.name,
            kind: input.kind,
            counters,
            status: crate::status::derive_status(&counters),
            year: input.year,
            location: input.location,
            purchase_price: input.purchase_price,
            estimated_value: input.estimated_value,
            notes: input.notes,
            comments: input.comments,
            origin: input.origin,
            gift_info: input.gift_info,
            photo: input.photo,
            acquired_at,
            updated_at: None,
            rating: input.rating,
            favorite: input.favorite,
            history: vec![seed],
        }
    }
}

/// Best-effort suggestion from the image-recognition collaborator.
///
/// Consumed only at bottle creation; the recognition service itself lives
/// outside the core.
#[derive(Clone, Debug, Deserialize)]
pub struct RecognitionSuggestion {
    pub name: String,
    pub kind: SpiritType,
    pub year: Option<u16>,
    pub estimated_value: Option<Decimal>,
}

impl RecognitionSuggestion {
    /// Creation input pre-filled from the suggestion.
    pub fn into_new_bottle(self, quantity: u32) -> NewBottle {
        NewBottle {
            year: self.year,
            estimated_value: self.estimated_value,
            ..NewBottle::new(self.name, self.kind, quantity)
        }
    }
}

/// Direct field edits that never touch counters, status or history.
///
/// `None` leaves the field unchanged; clearing a set optional field is not
/// expressible, matching partial-document writes that skip absent fields.
#[derive(Clone, Debug, Default)]
pub struct BottleEdit {
    pub name: Option<String>,
    pub kind: Option<SpiritType>,
    pub year: Option<u16>,
    pub location: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub comments: Option<String>,
    pub photo: Option<String>,
    pub rating: Option<u8>,
    pub favorite: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_by_stage() {
        let mut counters = QuantityCounters::with_stock(4);
        assert_eq!(counters.get(Stage::InStock), 4);
        assert_eq!(counters.get(Stage::Opened), 0);

        counters.set(Stage::Consumed, 2);
        assert_eq!(counters.get(Stage::Consumed), 2);
        assert_eq!(counters.total(), 6);
    }

    #[test]
    fn test_stage_serde_names() {
        assert_eq!(serde_json::to_string(&Stage::InStock).unwrap(), "\"in_stock\"");
        assert_eq!(serde_json::to_string(&Stage::Gifted).unwrap(), "\"gifted\"");

        let parsed: Stage = serde_json::from_str("\"opened\"").unwrap();
        assert_eq!(parsed, Stage::Opened);
    }

    #[test]
    fn test_create_seeds_counters_and_history() {
        let bottle = Bottle::create(
            BottleId("b1".into()),
            NewBottle::new("Talisker 10", SpiritType::Whisky, 3),
        );

        assert_eq!(bottle.counters, QuantityCounters::with_stock(3));
        assert_eq!(bottle.status, Stage::InStock);
        assert_eq!(bottle.history.len(), 1);

        let seed = &bottle.history[0];
        assert_eq!(seed.new_status, Stage::InStock);
        assert_eq!(seed.previous_status, None);
        assert_eq!(seed.quantity, 3);
    }

    #[test]
    fn test_zero_quantity_creation_defaults_to_in_stock() {
        let bottle = Bottle::create(
            BottleId("b2".into()),
            NewBottle::new("Empty slot", SpiritType::Gin, 0),
        );

        assert_eq!(bottle.status, Stage::InStock);
        assert_eq!(bottle.counters.total(), 0);
    }

    #[test]
    fn test_suggestion_prefills_creation_input() {
        let suggestion = RecognitionSuggestion {
            name: "Nikka From The Barrel".into(),
            kind: SpiritType::Whisky,
            year: Some(2019),
            estimated_value: Some(Decimal::new(5200, 2)),
        };

        let input = suggestion.into_new_bottle(1);
        assert_eq!(input.name, "Nikka From The Barrel");
        assert_eq!(input.year, Some(2019));
        assert_eq!(input.estimated_value, Some(Decimal::new(5200, 2)));
        assert_eq!(input.quantity, 1);
    }

    #[test]
    fn test_entry_duplicate_key() {
        let at = Utc::now();
        let a = StatusHistoryEntry {
            id: EntryId::generate(),
            at,
            new_status: Stage::Opened,
            previous_status: Some(Stage::InStock),
            quantity: 2,
            gift_info: None,
            rating: None,
            comments: None,
        };
        let mut b = a.clone();
        b.id = EntryId::generate();
        // Different id, same (timestamp, status, quantity) key.
        assert!(a.duplicates(&b));

        b.quantity = 3;
        assert!(!a.duplicates(&b));
    }
}
