//! Air Traffic Dispatch Core
//!
//! Per-airport landing queue over a key-value store: aircraft are enqueued
//! with a priority derived from type, size and emergency status, and
//! dequeued highest priority first, earliest arrival within a priority.
//!
//! # Architecture
//!
//! - **core**: Minute-resolution arrival time and clocks
//! - **ids**: Aircraft id generation
//! - **models**: Domain types (Aircraft, PriorityKey, index entries, events)
//! - **store**: Key-value boundary, aircraft records, the two derived indexes
//! - **orchestrator**: Enqueue/dequeue flow and error taxonomy
//! - **handlers**: Gateway request/response mapping
//!
//! # Critical Invariants
//!
//! 1. Priority keys are `UPPER(airport)-score`, score ordered numerically
//! 2. Aircraft ids are unique (insert-if-absent, bounded regeneration)
//! 3. Only the primary aircraft write decides success; index writes are
//!    best-effort and reported in the returned event log
//! 4. At most one dequeue wins any given aircraft

// Module declarations
pub mod core;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod orchestrator;
pub mod store;

// Re-exports for convenience
pub use crate::core::time::{ArrivalClock, ArrivalTime, ManualClock, SystemClock, TimeParseError};
pub use handlers::{
    create_aircraft_handler, dequeue_aircraft_handler, get_aircraft_handler, ErrorMessage, GatewayRequest,
    GatewayResponse,
};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use models::{
    aircraft::{Aircraft, AircraftSize, AircraftSpecialFlag, AircraftType, CreateAircraftRequest},
    event::{DispatchEvent, EventLog, IndexOp, IndexTarget, WriteOutcome},
    priority::PriorityKey,
};
pub use orchestrator::{ConfigError, Dequeued, DispatchConfig, DispatchError, DispatchOrchestrator, Enqueued};
pub use store::{KeyValueStore, MemoryStore, StoreError};
