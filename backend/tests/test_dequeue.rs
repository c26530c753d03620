//! Integration tests for dequeue
//!
//! Order of dispatch, the shared representative entry in the airport index,
//! and the not-found paths.

mod common;

use atc_dispatch_core::models::{AircraftSize, AircraftSpecialFlag, AircraftType, CreateAircraftRequest};
use atc_dispatch_core::store::{
    AircraftStore, AirportDispatchIndex, MemoryStore, PriorityIndex, TableAircraftStore, TableAirportIndex,
    TablePriorityIndex,
};
use atc_dispatch_core::{DispatchConfig, DispatchError, DispatchEvent, IndexOp, IndexTarget, SequentialIdGenerator, WriteOutcome};
use common::*;
use std::sync::Arc;

fn request(airport: &str, aircraft_type: AircraftType, size: AircraftSize) -> CreateAircraftRequest {
    CreateAircraftRequest::new(airport, aircraft_type, size)
}

#[test]
fn test_dispatch_order_across_categories() {
    let (orchestrator, _, clock) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));

    let cargo = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();
    clock.advance_minutes(1);
    let vip = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Vip, AircraftSize::Large))
        .unwrap();
    clock.advance_minutes(1);
    let passenger = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Passenger, AircraftSize::Small))
        .unwrap();
    clock.advance_minutes(1);
    let emergency = orchestrator
        .create_aircraft(
            &request("IAD", AircraftType::Cargo, AircraftSize::Small).with_special_flag(AircraftSpecialFlag::Emergency),
        )
        .unwrap();

    let order: Vec<String> = (0..4)
        .map(|_| orchestrator.dequeue_aircraft("IAD").unwrap().aircraft_id)
        .collect();

    assert_eq!(
        order,
        vec![
            emergency.aircraft_id,
            vip.aircraft_id,
            passenger.aircraft_id,
            cargo.aircraft_id
        ]
    );
}

#[test]
fn test_fifo_within_category() {
    let (orchestrator, _, clock) = memory_orchestrator(Arc::new(ScriptedIds::new(&["zulu", "alpha", "mike"])));

    // Ids deliberately out of arrival order
    for _ in 0..3 {
        orchestrator
            .create_aircraft(&request("SFO", AircraftType::Passenger, AircraftSize::Large))
            .unwrap();
        clock.advance_minutes(2);
    }

    let order: Vec<String> = (0..3)
        .map(|_| orchestrator.dequeue_aircraft("SFO").unwrap().aircraft_id)
        .collect();
    assert_eq!(order, vec!["zulu", "alpha", "mike"]);
}

#[test]
fn test_dequeue_returns_queued_snapshot_and_tombstones() {
    let (orchestrator, _, clock) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));
    let created = orchestrator
        .create_aircraft(&request("iad", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();

    clock.advance_minutes(7);
    let dequeued = orchestrator.dequeue("iad").unwrap();

    // Snapshot is the record as it was queued
    assert_eq!(dequeued.aircraft, created);
    assert_eq!(dequeued.events.events_of_type("AircraftRemoved").len(), 1);

    let record = orchestrator.get_aircraft(&created.aircraft_id).unwrap();
    assert_eq!(record.priority_key, None);
    assert_eq!(record.departure_time, Some(start_time().plus_minutes(7)));
}

#[test]
fn test_shared_key_keeps_representative_until_last_writer_leaves() {
    let (orchestrator, store, clock) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));
    let airports = TableAirportIndex::new(store.clone(), AIRPORT_TABLE);

    let first = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();
    clock.advance_minutes(5);
    let second = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();

    // First out did not write the representative: entry stays
    let dequeued = orchestrator.dequeue("IAD").unwrap();
    assert_eq!(dequeued.aircraft.aircraft_id, first.aircraft_id);
    assert!(matches!(
        dequeued.events.index_outcome(IndexTarget::AirportIndex, IndexOp::Remove),
        Some(WriteOutcome::Skipped { .. })
    ));
    assert!(airports.peek_top("IAD").unwrap().is_some());

    // Second out wrote it: entry goes
    let dequeued = orchestrator.dequeue("IAD").unwrap();
    assert_eq!(dequeued.aircraft.aircraft_id, second.aircraft_id);
    assert_eq!(
        dequeued.events.index_outcome(IndexTarget::AirportIndex, IndexOp::Remove),
        Some(&WriteOutcome::Applied)
    );
    assert_eq!(airports.peek_top("IAD").unwrap(), None);
}

#[test]
fn test_same_minute_arrivals_clear_representative_early() {
    let (orchestrator, store, _) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));

    orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();
    let stranded = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();

    orchestrator.dequeue_aircraft("IAD").unwrap();

    // Minute-resolution comparison matches the remaining aircraft too, so the
    // representative is gone while one aircraft is still queued.
    assert!(matches!(
        orchestrator.dequeue_aircraft("IAD"),
        Err(DispatchError::NotFound(_))
    ));
    let priorities = TablePriorityIndex::new(store.clone(), PRIORITY_TABLE);
    let left = priorities.peek_oldest("IAD-3070").unwrap().unwrap();
    assert_eq!(left.aircraft_id, stranded.aircraft_id);

    // A later arrival in the same category restores it
    orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();
    assert_eq!(
        orchestrator.dequeue_aircraft("IAD").unwrap().aircraft_id,
        stranded.aircraft_id
    );
}

#[test]
fn test_empty_airport_is_not_found_and_writes_nothing() {
    let config = split_config();
    let store = Arc::new(CountingStore::new(MemoryStore::with_tables(&config.table_names())));
    let (orchestrator, _) = orchestrator_over(store.clone(), &config, Arc::new(SequentialIdGenerator::new("ac")));

    let err = orchestrator.dequeue("IAD").unwrap_err();

    assert_eq!(
        err,
        DispatchError::NotFound("No aircraft queued at airport IAD".to_string())
    );
    assert_eq!(store.writes(), 0);
}

#[test]
fn test_airports_are_independent() {
    let (orchestrator, _, _) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));
    orchestrator
        .create_aircraft(&request("SFO", AircraftType::Vip, AircraftSize::Large))
        .unwrap();

    assert!(matches!(
        orchestrator.dequeue_aircraft("IAD"),
        Err(DispatchError::NotFound(_))
    ));
    assert!(orchestrator.dequeue_aircraft("sfo").is_ok());
}

#[test]
fn test_empty_priority_group_is_not_found() {
    let (orchestrator, store, _) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));

    // Representative with no aircraft behind it
    TableAirportIndex::new(store.clone(), AIRPORT_TABLE)
        .upsert("IAD", "IAD-7070", start_time())
        .unwrap();

    let err = orchestrator.dequeue("IAD").unwrap_err();
    assert_eq!(
        err,
        DispatchError::NotFound("No aircraft queued with priority IAD-7070".to_string())
    );
}

#[test]
fn test_already_removed_aircraft_clears_stale_priority_entry() {
    let (orchestrator, store, _) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));
    let created = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Vip, AircraftSize::Small))
        .unwrap();

    // Another dequeuer tombstoned the record but stopped before the indexes
    let records = TableAircraftStore::new(
        store.clone(),
        AIRCRAFT_TABLE,
        Arc::new(SequentialIdGenerator::new("unused")),
    );
    assert!(records
        .remove(&created.aircraft_id, start_time())
        .unwrap()
        .is_some());

    let err = orchestrator.dequeue("IAD").unwrap_err();
    assert_eq!(
        err,
        DispatchError::NotFound(format!("Aircraft {} was already dequeued", created.aircraft_id))
    );

    // Only the priority entry is cleared; the airport entry is left alone
    assert_eq!(store.item_count(PRIORITY_TABLE).unwrap(), 0);
    assert_eq!(store.item_count(AIRPORT_TABLE).unwrap(), 1);
    assert_eq!(
        orchestrator.dequeue("IAD").unwrap_err(),
        DispatchError::NotFound("No aircraft queued with priority IAD-7030".to_string())
    );
}

#[test]
fn test_dequeue_events_trace_each_step() {
    let (orchestrator, _, _) = memory_orchestrator(Arc::new(SequentialIdGenerator::new("ac")));
    let created = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Cargo, AircraftSize::Small))
        .unwrap();

    let dequeued = orchestrator.dequeue("IAD").unwrap();
    let kinds: Vec<&str> = dequeued.events.events().iter().map(DispatchEvent::event_type).collect();

    assert_eq!(
        kinds,
        vec![
            "TopPriorityResolved",
            "OldestResolved",
            "AircraftRemoved",
            "IndexWrite",
            "IndexWrite"
        ]
    );
    assert_eq!(dequeued.events.events_for_aircraft(&created.aircraft_id).len(), 3);
}

#[test]
fn test_default_shared_table_config() {
    let config = DispatchConfig::default();
    assert_eq!(config.priority_table, config.airport_table);
    let store = Arc::new(MemoryStore::with_tables(&config.table_names()));
    let (orchestrator, clock) = orchestrator_over(store, &config, Arc::new(SequentialIdGenerator::new("ac")));

    // A code shaped like a priority key would share a partition with one
    let err = orchestrator
        .create_aircraft(&request("X-3070", AircraftType::Cargo, AircraftSize::Large))
        .unwrap_err();
    assert_eq!(
        err,
        DispatchError::Validation("Airport code X-3070 must be alphanumeric".to_string())
    );

    clock.advance_minutes(1);
    let queued = orchestrator
        .create_aircraft(&request("x", AircraftType::Cargo, AircraftSize::Large))
        .unwrap();
    let other = orchestrator
        .create_aircraft(&request("IAD", AircraftType::Vip, AircraftSize::Small))
        .unwrap();

    assert_eq!(orchestrator.dequeue_aircraft("X").unwrap().aircraft_id, queued.aircraft_id);
    assert_eq!(orchestrator.dequeue_aircraft("IAD").unwrap().aircraft_id, other.aircraft_id);
    assert!(matches!(
        orchestrator.dequeue_aircraft("X-3070"),
        Err(DispatchError::Validation(_))
    ));
}
