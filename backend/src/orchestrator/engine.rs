//! Dispatch Orchestrator
//!
//! Composes the aircraft store and the two derived indexes into the enqueue
//! and dequeue operations.
//!
//! # Architecture
//!
//! ```text
//! enqueue(request):
//! 1. Validate airportCode, aircraftType, aircraftSize   (no writes on failure)
//! 2. Compute priority key
//! 3. AircraftStore.insert                                (id retry inside)
//! 4. PriorityIndex.add                                   best-effort
//! 5. AirportDispatchIndex.upsert                         best-effort
//!
//! dequeue(airport):
//! 1. AirportDispatchIndex.peek_top     → highest priority key
//! 2. PriorityIndex.peek_oldest(key)    → earliest aircraft with that key
//! 3. AircraftStore.remove(id)          → snapshot (tombstone)
//! 4. PriorityIndex.remove(key, id)     best-effort
//! 5. AirportDispatchIndex.remove       best-effort, only if the removed
//!                                      aircraft wrote the representative
//! ```
//!
//! # Consistency
//!
//! The store has no multi-item transactions, so these are independent
//! writes. A crash between steps 3 and 5 of enqueue leaves an aircraft that
//! is stored but not (fully) indexed. Dequeue never caches index state
//! between calls; every call re-peeks both indexes, and the conditional
//! tombstone decides which of two concurrent dequeues gets the aircraft.
//!
//! The orchestrator holds no mutable state of its own; the store is the only
//! shared resource, and it is safe to share one orchestrator across threads.
//!
//! # Example
//!
//! ```rust
//! use atc_dispatch_core::ids::SequentialIdGenerator;
//! use atc_dispatch_core::models::{AircraftSize, AircraftType, CreateAircraftRequest};
//! use atc_dispatch_core::orchestrator::{DispatchConfig, DispatchOrchestrator};
//! use atc_dispatch_core::store::MemoryStore;
//! use atc_dispatch_core::{ArrivalTime, ManualClock};
//! use std::sync::Arc;
//!
//! let config = DispatchConfig::default();
//! let store = Arc::new(MemoryStore::with_tables(&config.table_names()));
//! let clock = Arc::new(ManualClock::new(ArrivalTime::from_ymd_hm(2024, 1, 1, 12, 0).unwrap()));
//! let orchestrator = DispatchOrchestrator::with_store(
//!     store,
//!     &config,
//!     Arc::new(SequentialIdGenerator::new("ac")),
//!     clock,
//! )
//! .unwrap();
//!
//! let created = orchestrator
//!     .create_aircraft(&CreateAircraftRequest::new("iad", AircraftType::Cargo, AircraftSize::Large))
//!     .unwrap();
//! assert_eq!(created.priority_key.as_deref(), Some("IAD-3070"));
//!
//! let landed = orchestrator.dequeue_aircraft("IAD").unwrap();
//! assert_eq!(landed.aircraft_id, created.aircraft_id);
//! ```

use super::config::{ConfigError, DispatchConfig};
use super::error::DispatchError;
use crate::core::time::{ArrivalClock, ArrivalTime};
use crate::ids::IdGenerator;
use crate::models::aircraft::{Aircraft, CreateAircraftRequest, NewAircraft};
use crate::models::event::{DispatchEvent, EventLog, IndexOp, IndexTarget, WriteOutcome};
use crate::models::index_entry::{AirportIndexEntry, PriorityIndexEntry};
use crate::models::priority::PriorityKey;
use crate::store::{
    AircraftStore, AirportDispatchIndex, KeyValueStore, PriorityIndex, StoreError, TableAircraftStore,
    TableAirportIndex, TablePriorityIndex,
};
use std::sync::Arc;

const REQUIRE_AIRPORT_CODE: &str = "Require airportCode to create an airplane entry";
const REQUIRE_AIRCRAFT_SIZE: &str = "Require aircraftSize to create an airplane entry";
const REQUIRE_AIRCRAFT_TYPE: &str = "Require aircraftType to create an airplane entry";

/// Result of a successful enqueue
#[derive(Debug, Clone, PartialEq)]
pub struct Enqueued {
    /// Created aircraft, including generated id, priority key and arrival time
    pub aircraft: Aircraft,

    /// Everything the enqueue did, including index write outcomes
    pub events: EventLog,
}

/// Result of a successful dequeue
#[derive(Debug, Clone, PartialEq)]
pub struct Dequeued {
    /// Snapshot of the aircraft as it was queued
    pub aircraft: Aircraft,

    /// Everything the dequeue did, including index write outcomes
    pub events: EventLog,
}

/// Enqueue/dequeue engine over three independently-failable structures
pub struct DispatchOrchestrator {
    aircraft: Arc<dyn AircraftStore>,
    priorities: Arc<dyn PriorityIndex>,
    airports: Arc<dyn AirportDispatchIndex>,
    clock: Arc<dyn ArrivalClock>,
}

impl DispatchOrchestrator {
    /// Build from explicit store abstractions
    pub fn new(
        aircraft: Arc<dyn AircraftStore>,
        priorities: Arc<dyn PriorityIndex>,
        airports: Arc<dyn AirportDispatchIndex>,
        clock: Arc<dyn ArrivalClock>,
    ) -> Self {
        Self {
            aircraft,
            priorities,
            airports,
            clock,
        }
    }

    /// Wire the table-backed implementations over one key-value store
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchOrchestrator)` - ready to serve requests
    /// * `Err(ConfigError)` - a table name is empty
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        config: &DispatchConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn ArrivalClock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let aircraft = TableAircraftStore::new(store.clone(), config.aircraft_table.clone(), ids);
        let priorities = TablePriorityIndex::new(store.clone(), config.priority_table.clone());
        let airports = TableAirportIndex::new(store, config.airport_table.clone());

        Ok(Self::new(
            Arc::new(aircraft),
            Arc::new(priorities),
            Arc::new(airports),
            clock,
        ))
    }

    // ========================================================================
    // Enqueue
    // ========================================================================

    /// Queue an arriving aircraft
    ///
    /// # Errors
    ///
    /// * `Validation` - a required field is missing or the airport code is
    ///   not alphanumeric; nothing was written
    /// * `CreateFailed` - both id attempts collided; nothing was written
    /// * `ResourceMissing` / `Store` - the primary write failed
    ///
    /// Index write failures do not fail the enqueue; they are reported in
    /// [`Enqueued::events`].
    pub fn enqueue(&self, request: &CreateAircraftRequest) -> Result<Enqueued, DispatchError> {
        let new_aircraft = self.validate(request)?;
        let mut events = EventLog::new();

        let stored = self.aircraft.insert(new_aircraft)?;
        let aircraft = stored.aircraft;
        let priority_key = aircraft.priority_key.clone().unwrap_or_default();

        events.log(DispatchEvent::AircraftStored {
            aircraft_id: aircraft.aircraft_id.clone(),
            airport_code: aircraft.airport_code.clone(),
            priority_key: priority_key.clone(),
            attempts: stored.attempts,
        });

        // Not atomic with the insert above; see module docs
        let added = self
            .priorities
            .add(&priority_key, &aircraft.aircraft_id, aircraft.arrival_time)
            .map(|_| true);
        record_index_write(
            &mut events,
            IndexTarget::PriorityIndex,
            IndexOp::Add,
            &priority_key,
            &aircraft.aircraft_id,
            added,
        );

        let upserted = self
            .airports
            .upsert(&aircraft.airport_code, &priority_key, aircraft.arrival_time)
            .map(|_| true);
        record_index_write(
            &mut events,
            IndexTarget::AirportIndex,
            IndexOp::Upsert,
            &aircraft.airport_code,
            &priority_key,
            upserted,
        );

        tracing::info!(
            aircraft_id = %aircraft.aircraft_id,
            airport_code = %aircraft.airport_code,
            priority_key = %priority_key,
            arrival_time = %aircraft.arrival_time,
            "aircraft enqueued"
        );

        Ok(Enqueued { aircraft, events })
    }

    fn validate(&self, request: &CreateAircraftRequest) -> Result<NewAircraft, DispatchError> {
        let airport_code = request
            .airport_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| DispatchError::Validation(REQUIRE_AIRPORT_CODE.to_string()))
            .and_then(normalize_airport_code)?;
        let aircraft_size = request
            .aircraft_size
            .ok_or_else(|| DispatchError::Validation(REQUIRE_AIRCRAFT_SIZE.to_string()))?;
        let aircraft_type = request
            .aircraft_type
            .ok_or_else(|| DispatchError::Validation(REQUIRE_AIRCRAFT_TYPE.to_string()))?;

        let priority_key = PriorityKey::compute(
            &airport_code,
            aircraft_type,
            aircraft_size,
            request.aircraft_special_flag,
        );

        Ok(NewAircraft {
            airport_code: priority_key.airport_code().to_string(),
            aircraft_type,
            aircraft_size,
            aircraft_special_flag: request.aircraft_special_flag,
            priority_key: priority_key.to_string(),
            arrival_time: self.clock.now(),
        })
    }

    // ========================================================================
    // Dequeue
    // ========================================================================

    /// Remove the highest-priority, earliest-arrived aircraft at an airport
    ///
    /// # Errors
    ///
    /// * `Validation` - empty or non-alphanumeric airport code
    /// * `NotFound` - nothing queued at the airport, the top priority group
    ///   is empty (index inconsistency), or a concurrent dequeue removed the
    ///   aircraft first
    /// * `ResourceMissing` / `Store` - a lookup or the primary removal failed
    pub fn dequeue(&self, airport_code: &str) -> Result<Dequeued, DispatchError> {
        let airport_code = normalize_airport_code(airport_code)?;
        let mut events = EventLog::new();

        let top = self.airports.peek_top(&airport_code)?.ok_or_else(|| {
            DispatchError::NotFound(format!("No aircraft queued at airport {}", airport_code))
        })?;
        tracing::debug!(
            airport_code = %airport_code,
            priority_key = %top.priority_key,
            "highest priority resolved"
        );
        events.log(DispatchEvent::TopPriorityResolved {
            airport_code: airport_code.clone(),
            priority_key: top.priority_key.clone(),
        });

        let oldest = self.priorities.peek_oldest(&top.priority_key)?.ok_or_else(|| {
            DispatchError::NotFound(format!(
                "No aircraft queued with priority {}",
                top.priority_key
            ))
        })?;
        tracing::debug!(
            priority_key = %oldest.priority_key,
            aircraft_id = %oldest.aircraft_id,
            "oldest aircraft resolved"
        );
        events.log(DispatchEvent::OldestResolved {
            priority_key: oldest.priority_key.clone(),
            aircraft_id: oldest.aircraft_id.clone(),
        });

        let removed = self.aircraft.remove(&oldest.aircraft_id, self.clock.now())?;

        let Some(aircraft) = removed else {
            // Someone else dequeued it, or a previous dequeue stopped after
            // the tombstone. Only the priority entry is ours to clear: the
            // airport entry may already have been rewritten by a new arrival.
            tracing::warn!(
                aircraft_id = %oldest.aircraft_id,
                "aircraft already dequeued, clearing stale priority entry"
            );
            events.log(DispatchEvent::AircraftAlreadyRemoved {
                aircraft_id: oldest.aircraft_id.clone(),
            });
            self.remove_priority_entry(&mut events, &oldest);
            events.log(DispatchEvent::IndexWrite {
                target: IndexTarget::AirportIndex,
                op: IndexOp::Remove,
                partition: top.airport_code.clone(),
                sort: top.priority_key.clone(),
                outcome: WriteOutcome::Skipped {
                    reason: "aircraft was dequeued by another caller".to_string(),
                },
            });
            return Err(DispatchError::NotFound(format!(
                "Aircraft {} was already dequeued",
                oldest.aircraft_id
            )));
        };

        events.log(DispatchEvent::AircraftRemoved {
            aircraft_id: aircraft.aircraft_id.clone(),
            airport_code: aircraft.airport_code.clone(),
        });
        self.clear_indexes(&mut events, &top, &oldest, &aircraft.arrival_time);

        tracing::info!(
            aircraft_id = %aircraft.aircraft_id,
            airport_code = %airport_code,
            priority_key = %top.priority_key,
            "aircraft dequeued"
        );

        Ok(Dequeued { aircraft, events })
    }

    /// Best-effort removal of the index entries pointing at a dequeued aircraft
    fn clear_indexes(
        &self,
        events: &mut EventLog,
        top: &AirportIndexEntry,
        oldest: &PriorityIndexEntry,
        removed_arrival: &ArrivalTime,
    ) {
        self.remove_priority_entry(events, oldest);

        if top.represents(removed_arrival) {
            let removed = self
                .airports
                .remove(&top.airport_code, &top.priority_key)
                .map(|entry| entry.is_some());
            record_index_write(
                events,
                IndexTarget::AirportIndex,
                IndexOp::Remove,
                &top.airport_code,
                &top.priority_key,
                removed,
            );
        } else {
            // Entry belongs to a later arrival that is still queued
            events.log(DispatchEvent::IndexWrite {
                target: IndexTarget::AirportIndex,
                op: IndexOp::Remove,
                partition: top.airport_code.clone(),
                sort: top.priority_key.clone(),
                outcome: WriteOutcome::Skipped {
                    reason: format!(
                        "representative arrived at {}, still queued",
                        top.arrival_time
                    ),
                },
            });
        }
    }

    fn remove_priority_entry(&self, events: &mut EventLog, oldest: &PriorityIndexEntry) {
        let removed = self
            .priorities
            .remove(&oldest.priority_key, &oldest.aircraft_id)
            .map(|entry| entry.is_some());
        record_index_write(
            events,
            IndexTarget::PriorityIndex,
            IndexOp::Remove,
            &oldest.priority_key,
            &oldest.aircraft_id,
            removed,
        );
    }

    // ========================================================================
    // Boundary operations
    // ========================================================================

    /// Create an aircraft and return it
    pub fn create_aircraft(&self, request: &CreateAircraftRequest) -> Result<Aircraft, DispatchError> {
        self.enqueue(request).map(|enqueued| enqueued.aircraft)
    }

    /// Fetch an aircraft record (queued or already dequeued)
    pub fn get_aircraft(&self, aircraft_id: &str) -> Result<Aircraft, DispatchError> {
        if aircraft_id.trim().is_empty() {
            return Err(DispatchError::Validation(
                "Aircraft id must not be empty".to_string(),
            ));
        }
        self.aircraft
            .get(aircraft_id)?
            .ok_or_else(|| DispatchError::NotFound(format!("Aircraft {} does not exist", aircraft_id)))
    }

    /// Dequeue the next aircraft for an airport and return it
    pub fn dequeue_aircraft(&self, airport_code: &str) -> Result<Aircraft, DispatchError> {
        self.dequeue(airport_code).map(|dequeued| dequeued.aircraft)
    }
}

/// Trim, upper-case and check an airport code
///
/// Codes are ASCII alphanumeric. Priority keys are `<code>-<score>`, so a
/// code containing `-` could name a priority partition when both indexes
/// share one table.
fn normalize_airport_code(airport_code: &str) -> Result<String, DispatchError> {
    let trimmed = airport_code.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::Validation(
            "Airport code must not be empty".to_string(),
        ));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DispatchError::Validation(format!(
            "Airport code {} must be alphanumeric",
            trimmed
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Log the outcome of a best-effort index write; the result goes no further
fn record_index_write(
    events: &mut EventLog,
    target: IndexTarget,
    op: IndexOp,
    partition: &str,
    sort: &str,
    result: Result<bool, StoreError>,
) {
    let outcome = match result {
        Ok(true) => WriteOutcome::Applied,
        Ok(false) => WriteOutcome::Missing,
        Err(e) => {
            tracing::warn!(
                target_index = %target,
                partition = %partition,
                sort = %sort,
                error = %e,
                "best-effort index write failed"
            );
            WriteOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    events.log(DispatchEvent::IndexWrite {
        target,
        op,
        partition: partition.to_string(),
        sort: sort.to_string(),
        outcome,
    });
}
