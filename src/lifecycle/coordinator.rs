//! Transition orchestration.

use chrono::{DateTime, Utc};

use crate::error::{CellarError, Result};
use crate::history;
use crate::ledger;
use crate::status::derive_status;
use crate::types::{Bottle, EntryId, GiftInfo, Stage, StatusHistoryEntry};

use super::update::BottleUpdate;

/// A requested lifecycle transition.
///
/// `entry_id` and `at` are normally left unset and generated at transition
/// time; tests supply both for deterministic history entries.
#[derive(Clone, Debug)]
pub struct TransitionRequest {
    /// Target stage the units move to.
    pub to: Stage,

    /// Units to move. Must be positive.
    pub quantity: u32,

    /// Source stage. `None` lets the coordinator pick the default
    /// (open/gift draw from stock; consume draws from stock unless the
    /// caller selects `opened`).
    pub from: Option<Stage>,

    /// Gift recipient; required for gift transitions.
    pub recipient: Option<String>,

    /// Rating snapshot recorded on the history entry and the bottle.
    pub rating: Option<u8>,

    /// Comment snapshot recorded on the history entry and the bottle.
    pub comments: Option<String>,

    pub entry_id: Option<EntryId>,

    pub at: Option<DateTime<Utc>>,
}

impl TransitionRequest {
    fn to_stage(to: Stage, quantity: u32) -> Self {
        Self {
            to,
            quantity,
            from: None,
            recipient: None,
            rating: None,
            comments: None,
            entry_id: None,
            at: None,
        }
    }

    /// Add units to stock.
    pub fn restock(quantity: u32) -> Self {
        Self::to_stage(Stage::InStock, quantity)
    }

    /// Open units from stock.
    pub fn open(quantity: u32) -> Self {
        Self::to_stage(Stage::Opened, quantity)
    }

    /// Consume units straight from stock.
    pub fn consume(quantity: u32) -> Self {
        Self::to_stage(Stage::Consumed, quantity)
    }

    /// Consume units that were previously opened.
    pub fn consume_opened(quantity: u32) -> Self {
        Self {
            from: Some(Stage::Opened),
            ..Self::to_stage(Stage::Consumed, quantity)
        }
    }

    /// Gift units from stock to a recipient.
    pub fn gift(quantity: u32, recipient: impl Into<String>) -> Self {
        Self {
            recipient: Some(recipient.into()),
            ..Self::to_stage(Stage::Gifted, quantity)
        }
    }

    /// Override the source stage.
    pub fn with_source(mut self, from: Stage) -> Self {
        self.from = Some(from);
        self
    }

    /// Attach a rating snapshot.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attach a comment snapshot.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Pin the history entry id (for deterministic tests).
    pub fn with_entry_id(mut self, id: EntryId) -> Self {
        self.entry_id = Some(id);
        self
    }

    /// Pin the transition timestamp (for deterministic tests).
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }
}

/// Compute the full effect of a transition as one merged update.
///
/// Fails without producing any partial state: either the returned
/// [`BottleUpdate`] carries the two changed counters, the derived status and
/// the appended history, or the bottle is untouched and the caller receives
/// the validation error as-is.
pub fn transition(bottle: &Bottle, request: TransitionRequest) -> Result<BottleUpdate> {
    let from = request.from.or_else(|| ledger::source_for(request.to));

    // Gift transitions carry their recipient or fail before any computation.
    let gift_recipient = if request.to == Stage::Gifted {
        match request.recipient.as_deref().map(str::trim) {
            Some(recipient) if !recipient.is_empty() => Some(recipient.to_string()),
            _ => {
                return Err(CellarError::InvalidTransition(
                    "gift requires a recipient".to_string(),
                ))
            }
        }
    } else {
        None
    };

    let next = ledger::apply(bottle.counters, from, request.to, request.quantity)?;

    let at = request.at.unwrap_or_else(Utc::now);
    let entry = StatusHistoryEntry {
        id: request.entry_id.unwrap_or_else(EntryId::generate),
        at,
        new_status: request.to,
        // The status before the transition, not the source stage: a restock
        // while already in stock records in_stock -> in_stock.
        previous_status: Some(bottle.status),
        quantity: request.quantity,
        gift_info: gift_recipient.map(|recipient| GiftInfo {
            from: None,
            to: Some(recipient),
            date: Some(at),
        }),
        rating: request.rating,
        comments: request.comments.clone(),
    };

    let mut update = BottleUpdate::default();
    if let Some(from) = from {
        update.set_counter(from, next.get(from));
    }
    update.set_counter(request.to, next.get(request.to));
    update.status = Some(derive_status(&next));
    update.gift_info = entry.gift_info.clone();
    update.history = Some(history::append_entry(bottle.history.clone(), entry));
    update.rating = request.rating;
    update.comments = request.comments;
    update.updated_at = Some(at);

    tracing::debug!(
        bottle = %bottle.id,
        to = %request.to,
        quantity = request.quantity,
        status = %update.status.unwrap_or(bottle.status),
        "computed transition"
    );

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BottleId, NewBottle, SpiritType};

    fn bottle(quantity: u32) -> Bottle {
        Bottle::create(
            BottleId("b1".into()),
            NewBottle::new("Clynelish 14", SpiritType::Whisky, quantity),
        )
    }

    #[test]
    fn test_open_keeps_in_stock_status_while_stock_remains() {
        let bottle = bottle(6);
        let update = transition(&bottle, TransitionRequest::open(2)).unwrap();

        assert_eq!(update.in_stock, Some(4));
        assert_eq!(update.opened, Some(2));
        assert_eq!(update.status, Some(Stage::InStock));
        // Untouched counters are absent from the partial update.
        assert_eq!(update.consumed, None);
        assert_eq!(update.gifted, None);
    }

    #[test]
    fn test_history_entry_records_action_and_prior_status() {
        let mut bottle = bottle(6);
        let update = transition(&bottle, TransitionRequest::open(6)).unwrap();
        update.apply_to(&mut bottle);
        assert_eq!(bottle.status, Stage::Opened);

        // Restock on an `opened` bottle: previous_status is the derived
        // status before the move, not the source counter.
        let update = transition(&bottle, TransitionRequest::restock(3)).unwrap();
        let history = update.history.as_ref().unwrap();
        let entry = history.last().unwrap();
        assert_eq!(entry.new_status, Stage::InStock);
        assert_eq!(entry.previous_status, Some(Stage::Opened));
        assert_eq!(update.status, Some(Stage::InStock));
    }

    #[test]
    fn test_restock_leaves_other_counters_alone() {
        let mut bottle = bottle(4);
        let update = transition(&bottle, TransitionRequest::open(3)).unwrap();
        update.apply_to(&mut bottle);

        let update = transition(&bottle, TransitionRequest::restock(5)).unwrap();
        assert_eq!(update.in_stock, Some(6));
        assert_eq!(update.opened, None);
        assert_eq!(update.consumed, None);
    }

    #[test]
    fn test_consume_defaults_to_stock_source() {
        let bottle = bottle(5);
        let update = transition(&bottle, TransitionRequest::consume(2)).unwrap();
        assert_eq!(update.in_stock, Some(3));
        assert_eq!(update.consumed, Some(2));
        assert_eq!(update.opened, None);
    }

    #[test]
    fn test_gift_requires_recipient() {
        let bottle = bottle(2);

        let mut request = TransitionRequest::gift(1, "  ");
        assert!(matches!(
            transition(&bottle, request.clone()),
            Err(CellarError::InvalidTransition(_))
        ));

        request.recipient = None;
        assert!(matches!(
            transition(&bottle, request),
            Err(CellarError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_gift_populates_gift_info() {
        let bottle = bottle(2);
        let update = transition(&bottle, TransitionRequest::gift(1, "Margaux")).unwrap();

        let history = update.history.as_ref().unwrap();
        let entry = history.last().unwrap();
        assert_eq!(
            entry.gift_info.as_ref().unwrap().to.as_deref(),
            Some("Margaux")
        );
        assert_eq!(
            update.gift_info.as_ref().unwrap().to.as_deref(),
            Some("Margaux")
        );
    }

    #[test]
    fn test_failure_produces_no_update() {
        let bottle = bottle(3);
        let before = bottle.clone();

        let result = transition(&bottle, TransitionRequest::open(5));
        assert!(matches!(
            result,
            Err(CellarError::InsufficientQuantity {
                requested: 5,
                available: 3
            })
        ));
        assert_eq!(bottle, before);
    }

    #[test]
    fn test_duplicate_submission_appends_once() {
        let bottle = bottle(6);
        let at = Utc::now();

        let first = transition(&bottle, TransitionRequest::open(2).at(at)).unwrap();
        let mut merged = bottle.clone();
        first.apply_to(&mut merged);
        // `merged` now has counters (4, 2, 0, 0) but the UI re-submits the
        // same action against it with an identical timestamp.
        let mut replay = merged.clone();
        replay.counters = bottle.counters;
        let second = transition(&replay, TransitionRequest::open(2).at(at)).unwrap();

        assert_eq!(
            second.history.as_ref().unwrap().len(),
            first.history.as_ref().unwrap().len()
        );
    }

    #[test]
    fn test_rating_and_comments_snapshot() {
        let bottle = bottle(1);
        let update = transition(
            &bottle,
            TransitionRequest::consume(1)
                .with_rating(5)
                .with_comments("Peaty, long finish"),
        )
        .unwrap();

        let entry = update.history.as_ref().unwrap().last().unwrap().clone();
        assert_eq!(entry.rating, Some(5));
        assert_eq!(entry.comments.as_deref(), Some("Peaty, long finish"));
        assert_eq!(update.rating, Some(5));
    }
}
