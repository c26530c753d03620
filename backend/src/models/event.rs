//! Dispatch event log
//!
//! Every enqueue and dequeue returns the events it produced, in order. The
//! log is how callers (and tests) observe best-effort index writes: a failed
//! index write never fails the operation, it shows up here as
//! [`WriteOutcome::Failed`] and in the `warn` log.
//!
//! # Event Types
//!
//! - **AircraftStored**: primary record written (with the attempt count)
//! - **TopPriorityResolved** / **OldestResolved**: dequeue lookups
//! - **AircraftRemoved** / **AircraftAlreadyRemoved**: primary record tombstoned,
//!   or someone else got there first
//! - **IndexWrite**: one secondary index mutation and its outcome
//!
//! # Example
//!
//! ```rust
//! use atc_dispatch_core::models::{DispatchEvent, EventLog, IndexOp, IndexTarget, WriteOutcome};
//!
//! let mut log = EventLog::new();
//! log.log(DispatchEvent::IndexWrite {
//!     target: IndexTarget::AirportIndex,
//!     op: IndexOp::Remove,
//!     partition: "IAD".to_string(),
//!     sort: "IAD-3070".to_string(),
//!     outcome: WriteOutcome::Failed { error: "timeout".to_string() },
//! });
//!
//! assert_eq!(log.failed_index_writes().len(), 1);
//! ```

use std::fmt;

/// Which derived index a write touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    PriorityIndex,
    AirportIndex,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexTarget::PriorityIndex => write!(f, "priority index"),
            IndexTarget::AirportIndex => write!(f, "airport index"),
        }
    }
}

/// Kind of index mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOp {
    Add,
    Upsert,
    Remove,
}

/// Result of a best-effort index write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Write reached the store
    Applied,

    /// Remove found nothing to delete
    Missing,

    /// Write deliberately not attempted
    Skipped { reason: String },

    /// Store rejected the write; operation carried on
    Failed { error: String },
}

/// Something an enqueue or dequeue did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// Primary aircraft record written
    AircraftStored {
        aircraft_id: String,
        airport_code: String,
        priority_key: String,
        /// Attempts used, including id collisions
        attempts: u32,
    },

    /// Highest priority key found for an airport
    TopPriorityResolved {
        airport_code: String,
        priority_key: String,
    },

    /// Oldest aircraft found for a priority key
    OldestResolved {
        priority_key: String,
        aircraft_id: String,
    },

    /// Primary record tombstoned by this dequeue
    AircraftRemoved {
        aircraft_id: String,
        airport_code: String,
    },

    /// Primary record was already gone (concurrent dequeue)
    AircraftAlreadyRemoved { aircraft_id: String },

    /// Secondary index mutation
    IndexWrite {
        target: IndexTarget,
        op: IndexOp,
        partition: String,
        sort: String,
        outcome: WriteOutcome,
    },
}

impl DispatchEvent {
    /// Short name of the event variant
    pub fn event_type(&self) -> &'static str {
        match self {
            DispatchEvent::AircraftStored { .. } => "AircraftStored",
            DispatchEvent::TopPriorityResolved { .. } => "TopPriorityResolved",
            DispatchEvent::OldestResolved { .. } => "OldestResolved",
            DispatchEvent::AircraftRemoved { .. } => "AircraftRemoved",
            DispatchEvent::AircraftAlreadyRemoved { .. } => "AircraftAlreadyRemoved",
            DispatchEvent::IndexWrite { .. } => "IndexWrite",
        }
    }

    /// Aircraft the event relates to, if any
    pub fn aircraft_id(&self) -> Option<&str> {
        match self {
            DispatchEvent::AircraftStored { aircraft_id, .. } => Some(aircraft_id),
            DispatchEvent::OldestResolved { aircraft_id, .. } => Some(aircraft_id),
            DispatchEvent::AircraftRemoved { aircraft_id, .. } => Some(aircraft_id),
            DispatchEvent::AircraftAlreadyRemoved { aircraft_id } => Some(aircraft_id),
            DispatchEvent::IndexWrite {
                target: IndexTarget::PriorityIndex,
                sort,
                ..
            } => Some(sort),
            _ => None,
        }
    }
}

/// Ordered list of dispatch events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<DispatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: DispatchEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in order
    pub fn events(&self) -> &[DispatchEvent] {
        &self.events
    }

    /// Events of one variant
    pub fn events_of_type(&self, event_type: &str) -> Vec<&DispatchEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events about one aircraft
    pub fn events_for_aircraft(&self, aircraft_id: &str) -> Vec<&DispatchEvent> {
        self.events
            .iter()
            .filter(|e| e.aircraft_id() == Some(aircraft_id))
            .collect()
    }

    /// Outcome of the first write of `op` against `target`, if one was logged
    pub fn index_outcome(&self, target: IndexTarget, op: IndexOp) -> Option<&WriteOutcome> {
        self.events.iter().find_map(|e| match e {
            DispatchEvent::IndexWrite {
                target: t,
                op: o,
                outcome,
                ..
            } if *t == target && *o == op => Some(outcome),
            _ => None,
        })
    }

    /// Index writes the store rejected
    pub fn failed_index_writes(&self) -> Vec<&DispatchEvent> {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    DispatchEvent::IndexWrite {
                        outcome: WriteOutcome::Failed { .. },
                        ..
                    }
                )
            })
            .collect()
    }
}
