//! Consistency sweep, history dedup guards and failure-path tests.

use chrono::Utc;
use cellar::{
    history, Bottle, BottleId, BottleRepository, Cellar, CellarConfig, CellarError, EntryId,
    MemoryRepository, NewBottle, OwnerId, SpiritType, Stage, StatusHistoryEntry,
    TransitionRequest,
};

fn owner() -> OwnerId {
    OwnerId("owner-1".into())
}

/// A legacy document whose stored status was never recomputed.
fn drifted_bottle(id: &str) -> Bottle {
    let mut bottle = Bottle::create(
        BottleId(id.into()),
        NewBottle::new("Legacy", SpiritType::Calvados, 0),
    );
    bottle.counters.consumed = 3;
    bottle.status = Stage::Opened;
    bottle
}

// --- Consistency sweep ---

#[test]
fn test_sweep_repairs_drifted_status() {
    let repo = MemoryRepository::new();
    repo.insert_raw(owner(), drifted_bottle("legacy-1"));

    let cellar = Cellar::with_config(
        repo,
        CellarConfig {
            sweep_on_load: false,
            ..Default::default()
        },
    );
    cellar.load(&owner()).unwrap();

    let report = cellar.sweep().unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(
        report.repaired,
        vec![(BottleId("legacy-1".into()), Stage::Consumed)]
    );

    // Both the cache and the stored document were corrected.
    let bottle = cellar.bottle(&BottleId("legacy-1".into())).unwrap();
    assert_eq!(bottle.status, Stage::Consumed);
    let stored = cellar.repository().get(&BottleId("legacy-1".into())).unwrap();
    assert_eq!(stored.status, Stage::Consumed);
    // Counters and history stay untouched.
    assert_eq!(stored.counters.consumed, 3);
    assert_eq!(stored.history.len(), 1);
}

#[test]
fn test_sweep_is_idempotent() {
    let repo = MemoryRepository::new();
    repo.insert_raw(owner(), drifted_bottle("legacy-1"));
    repo.insert_raw(owner(), drifted_bottle("legacy-2"));

    let cellar = Cellar::with_config(
        repo,
        CellarConfig {
            sweep_on_load: false,
            ..Default::default()
        },
    );
    cellar.load(&owner()).unwrap();

    let first = cellar.sweep().unwrap();
    assert_eq!(first.repaired.len(), 2);

    let second = cellar.sweep().unwrap();
    assert!(second.is_clean());
    assert_eq!(second.examined, 2);
}

#[test]
fn test_sweep_runs_on_load_by_default() {
    let repo = MemoryRepository::new();
    repo.insert_raw(owner(), drifted_bottle("legacy-1"));

    let cellar = Cellar::new(repo);
    cellar.load(&owner()).unwrap();

    assert_eq!(
        cellar.bottle(&BottleId("legacy-1".into())).unwrap().status,
        Stage::Consumed
    );
}

#[test]
fn test_sweep_ignores_consistent_bottles() {
    let cellar = Cellar::new(MemoryRepository::new());
    let bottle = cellar
        .add(&owner(), NewBottle::new("Fresh", SpiritType::Vodka, 2))
        .unwrap();
    cellar
        .transition(&bottle.id, TransitionRequest::open(1))
        .unwrap();

    let report = cellar.sweep().unwrap();
    assert!(report.is_clean());
}

// --- History duplicate guards ---

#[test]
fn test_write_side_dedup_keeps_length() {
    let at = Utc::now();
    let entry = StatusHistoryEntry {
        id: EntryId::generate(),
        at,
        new_status: Stage::Opened,
        previous_status: Some(Stage::InStock),
        quantity: 2,
        gift_info: None,
        rating: None,
        comments: None,
    };
    let mut resubmitted = entry.clone();
    resubmitted.id = EntryId::generate();

    let log = history::append_entry(Vec::new(), entry);
    let log = history::append_entry(log, resubmitted);
    assert_eq!(log.len(), 1);
}

#[test]
fn test_read_side_dedup_handles_legacy_duplicates() {
    // A stored document with duplicate rows written before the write-side
    // guard existed.
    let mut bottle = drifted_bottle("legacy-1");
    let duplicate = StatusHistoryEntry {
        id: EntryId::generate(),
        ..bottle.history[0].clone()
    };
    bottle.history.push(duplicate);

    let display = history::display_order(&bottle.history);
    assert_eq!(display.len(), 1);
}

// --- Failure paths ---

#[test]
fn test_unavailable_persistence_propagates_and_rolls_nothing() {
    let cellar = Cellar::new(MemoryRepository::new());
    let bottle = cellar
        .add(&owner(), NewBottle::new("Rioja", SpiritType::RedWine, 4))
        .unwrap();

    cellar.repository().set_offline(true);

    let result = cellar.transition(&bottle.id, TransitionRequest::open(2));
    assert!(matches!(
        result,
        Err(CellarError::PersistenceUnavailable(_))
    ));

    let result = cellar.delete(&bottle.id);
    assert!(matches!(
        result,
        Err(CellarError::PersistenceUnavailable(_))
    ));

    cellar.repository().set_offline(false);

    // The cache still serves the pre-failure snapshot and the next
    // transition starts from it cleanly.
    let updated = cellar
        .transition(&bottle.id, TransitionRequest::open(2))
        .unwrap();
    assert_eq!(updated.counters.in_stock, 2);
    assert_eq!(updated.history.len(), 2);
}

#[test]
fn test_validation_failure_before_any_write() {
    let cellar = Cellar::new(MemoryRepository::new());
    let bottle = cellar
        .add(&owner(), NewBottle::new("Porto", SpiritType::RedWine, 1))
        .unwrap();

    // Offline repository would fail any write; an invalid request must not
    // reach it.
    cellar.repository().set_offline(true);
    let result = cellar.transition(&bottle.id, TransitionRequest::open(0));
    assert!(matches!(result, Err(CellarError::InvalidTransition(_))));
}

#[test]
fn test_unknown_bottle_fails_before_computation() {
    let cellar = Cellar::new(MemoryRepository::new());
    let result = cellar.transition(&BottleId("ghost".into()), TransitionRequest::open(1));
    assert!(matches!(result, Err(CellarError::BottleNotFound(_))));
}
