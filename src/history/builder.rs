//! History entry construction and ordering.

use crate::types::StatusHistoryEntry;

/// Append an entry to the history, skipping duplicates.
///
/// An entry sharing `(timestamp, new_status, quantity)` with an existing one
/// is treated as a duplicate submission and the append is a no-op. Entries
/// stay in insertion order; chronological display goes through
/// [`display_order`].
pub fn append_entry(
    mut history: Vec<StatusHistoryEntry>,
    entry: StatusHistoryEntry,
) -> Vec<StatusHistoryEntry> {
    if history.iter().any(|existing| existing.duplicates(&entry)) {
        return history;
    }
    history.push(entry);
    history
}

/// History prepared for display: deduplicated and sorted newest-first.
///
/// Read-side dedup is intentionally redundant with [`append_entry`]:
/// persisted data written before the write-side guard existed can still
/// contain duplicate rows.
pub fn display_order(history: &[StatusHistoryEntry]) -> Vec<StatusHistoryEntry> {
    let mut unique: Vec<StatusHistoryEntry> = Vec::with_capacity(history.len());
    for entry in history {
        if !unique.iter().any(|kept| kept.duplicates(entry)) {
            unique.push(entry.clone());
        }
    }

    unique.sort_by(|a, b| b.at.cmp(&a.at));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryId, Stage};
    use chrono::{Duration, Utc};

    fn entry(at_offset_secs: i64, new_status: Stage, quantity: u32) -> StatusHistoryEntry {
        StatusHistoryEntry {
            id: EntryId::generate(),
            at: Utc::now() + Duration::seconds(at_offset_secs),
            new_status,
            previous_status: Some(Stage::InStock),
            quantity,
            gift_info: None,
            rating: None,
            comments: None,
        }
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let history = append_entry(Vec::new(), entry(0, Stage::Opened, 1));
        let history = append_entry(history, entry(10, Stage::Consumed, 1));

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].new_status, Stage::Opened);
        assert_eq!(history[1].new_status, Stage::Consumed);
    }

    #[test]
    fn test_append_skips_duplicate_key() {
        let first = entry(0, Stage::Opened, 2);
        let mut duplicate = entry(0, Stage::Opened, 2);
        duplicate.at = first.at;

        let history = append_entry(Vec::new(), first);
        let history = append_entry(history, duplicate);

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_same_timestamp_different_quantity_is_not_duplicate() {
        let first = entry(0, Stage::Opened, 2);
        let mut second = entry(0, Stage::Opened, 3);
        second.at = first.at;

        let history = append_entry(Vec::new(), first);
        let history = append_entry(history, second);

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_display_order_is_newest_first() {
        let history = vec![
            entry(0, Stage::Opened, 1),
            entry(20, Stage::Consumed, 1),
            entry(10, Stage::Opened, 3),
        ];

        let display = display_order(&history);
        assert_eq!(display.len(), 3);
        assert!(display[0].at >= display[1].at && display[1].at >= display[2].at);
        assert_eq!(display[0].new_status, Stage::Consumed);
    }

    #[test]
    fn test_display_dedups_legacy_rows() {
        // Simulate persisted duplicates that bypassed the write-side guard.
        let original = entry(0, Stage::Gifted, 1);
        let mut stored_twice = original.clone();
        stored_twice.id = EntryId::generate();

        let display = display_order(&[original, stored_twice]);
        assert_eq!(display.len(), 1);
    }
}
