//! Domain models for the dispatch queue

pub mod aircraft;
pub mod event;
pub mod index_entry;
pub mod priority;

// Re-exports
pub use aircraft::{
    Aircraft, AircraftSize, AircraftSpecialFlag, AircraftType, CreateAircraftRequest, NewAircraft,
};
pub use event::{DispatchEvent, EventLog, IndexOp, IndexTarget, WriteOutcome};
pub use index_entry::{AirportIndexEntry, PriorityIndexEntry};
pub use priority::{PriorityKey, PriorityKeyError};
