//! Aircraft record storage
//!
//! Primary records keyed by aircraft id. Uniqueness of the id is the only
//! property the store itself enforces: every insert is conditioned on the
//! key being absent, so two concurrent creates can never share an id.
//!
//! # Insert Flow
//!
//! ```text
//! attempt 1: generate id → put if absent ─┬─ Stored    → done
//!                                         ├─ Collision → attempt 2
//!                                         └─ Failed    → error
//! attempt 2: generate id → put if absent ─┬─ Stored    → done
//!                                         └─ Collision → CreateFailed
//! ```
//!
//! # Removal
//!
//! Removal is a tombstone update, not a delete: the record keeps its history
//! but loses its priority key and gains a departure time. The update is
//! conditioned on the priority key still being present, so when two
//! dequeues race on the same aircraft exactly one of them gets the snapshot
//! and the other sees `None`.

use super::{from_item, to_item, Condition, ItemKey, KeyValueStore, StoreError};
use crate::core::time::ArrivalTime;
use crate::ids::IdGenerator;
use crate::models::aircraft::{Aircraft, NewAircraft};
use std::sync::Arc;
use thiserror::Error;

/// Total insert attempts before giving up
pub const MAX_CREATE_ATTEMPTS: u32 = 2;

const PRIORITY_KEY_ATTR: &str = "priorityKey";

/// Errors returned by [`AircraftStore::insert`]
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InsertError {
    /// Every attempt collided with an existing id
    #[error("Unable to generate aircraft after {attempts} tries")]
    CreateFailed { attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a single conditional insert attempt
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// Record written
    Stored(Aircraft),

    /// Id already taken; caller may retry with a fresh id
    Collision { aircraft_id: String },

    /// Store rejected the write for another reason
    Failed(StoreError),
}

/// A freshly inserted aircraft and the attempts it took
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAircraft {
    pub aircraft: Aircraft,
    pub attempts: u32,
}

/// Keyed storage for aircraft records
pub trait AircraftStore: Send + Sync {
    /// Insert under a newly generated id, retrying once on collision
    fn insert(&self, aircraft: NewAircraft) -> Result<StoredAircraft, InsertError>;

    /// Read a record (queued or dequeued)
    fn get(&self, aircraft_id: &str) -> Result<Option<Aircraft>, StoreError>;

    /// Tombstone a queued record and return its prior snapshot
    ///
    /// `None` if the id is unknown or the aircraft was already dequeued.
    fn remove(&self, aircraft_id: &str, departed_at: ArrivalTime) -> Result<Option<Aircraft>, StoreError>;
}

/// [`AircraftStore`] backed by one key-value table
pub struct TableAircraftStore {
    store: Arc<dyn KeyValueStore>,
    table: String,
    ids: Arc<dyn IdGenerator>,
}

impl TableAircraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>, table: impl Into<String>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            table: table.into(),
            ids,
        }
    }

    /// Table the records live in
    pub fn table(&self) -> &str {
        &self.table
    }

    /// One conditional insert under a fresh id
    pub fn try_insert(&self, aircraft: NewAircraft) -> InsertOutcome {
        let record = aircraft.with_id(self.ids.next_id());
        let item = match to_item(&self.table, &record) {
            Ok(item) => item,
            Err(e) => return InsertOutcome::Failed(e),
        };
        let key = ItemKey::partition(record.aircraft_id.clone());

        match self.store.put(&self.table, key, item, Condition::KeyAbsent) {
            Ok(_) => InsertOutcome::Stored(record),
            Err(StoreError::ConditionFailed) => InsertOutcome::Collision {
                aircraft_id: record.aircraft_id,
            },
            Err(e) => InsertOutcome::Failed(e),
        }
    }
}

impl AircraftStore for TableAircraftStore {
    fn insert(&self, aircraft: NewAircraft) -> Result<StoredAircraft, InsertError> {
        let mut attempts = 0;

        while attempts < MAX_CREATE_ATTEMPTS {
            attempts += 1;
            match self.try_insert(aircraft.clone()) {
                InsertOutcome::Stored(aircraft) => {
                    return Ok(StoredAircraft { aircraft, attempts });
                }
                InsertOutcome::Collision { aircraft_id } => {
                    tracing::warn!(
                        aircraft_id = %aircraft_id,
                        attempt = attempts,
                        "aircraft id collision, regenerating"
                    );
                }
                InsertOutcome::Failed(e) => return Err(e.into()),
            }
        }

        Err(InsertError::CreateFailed { attempts })
    }

    fn get(&self, aircraft_id: &str) -> Result<Option<Aircraft>, StoreError> {
        self.store
            .get(&self.table, &ItemKey::partition(aircraft_id))?
            .map(|item| from_item(&self.table, item))
            .transpose()
    }

    fn remove(&self, aircraft_id: &str, departed_at: ArrivalTime) -> Result<Option<Aircraft>, StoreError> {
        let Some(snapshot) = self.get(aircraft_id)? else {
            return Ok(None);
        };
        if !snapshot.is_queued() {
            return Ok(None);
        }

        let mut tombstone = snapshot.clone();
        tombstone.priority_key = None;
        tombstone.departure_time = Some(departed_at);
        let item = to_item(&self.table, &tombstone)?;

        match self.store.put(
            &self.table,
            ItemKey::partition(aircraft_id),
            item,
            Condition::AttributePresent(PRIORITY_KEY_ATTR.to_string()),
        ) {
            Ok(_) => Ok(Some(snapshot)),
            // Lost the race to another dequeue
            Err(StoreError::ConditionFailed) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
