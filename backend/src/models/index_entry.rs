//! Secondary index entries
//!
//! Two derived indexes make dequeue a pair of O(1) lookups instead of a scan
//! over every queued aircraft:
//!
//! ```text
//! airport index:   (airportCode, priorityKey) → arrivalTime   newest contributor
//! priority index:  (priorityKey, aircraftId)  → arrivalTime   one row per aircraft
//! ```
//!
//! Dequeue reads the airport partition in descending score order to find the
//! best priority key, then the priority partition in ascending arrival order
//! to find the oldest aircraft holding that key.
//!
//! The airport entry is a *representative*: one row stands for every aircraft
//! sharing the key, and it only remembers the most recent arrival (last
//! writer wins).

use crate::core::time::ArrivalTime;
use serde::{Deserialize, Serialize};

/// One queued aircraft within a priority group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityIndexEntry {
    pub priority_key: String,
    pub aircraft_id: String,
    pub arrival_time: ArrivalTime,
}

/// Representative entry for a priority group at an airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportIndexEntry {
    pub airport_code: String,
    pub priority_key: String,
    /// Arrival time of the latest aircraft that wrote this entry
    pub arrival_time: ArrivalTime,
}

impl AirportIndexEntry {
    /// Whether this entry was last written by an aircraft with `arrival`
    ///
    /// Dequeue only clears the representative when the aircraft it removed is
    /// the one that wrote it; otherwise another aircraft still shares the key.
    pub fn represents(&self, arrival: &ArrivalTime) -> bool {
        &self.arrival_time == arrival
    }
}
