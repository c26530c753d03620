//! Orchestrator - enqueue/dequeue over the aircraft store and its indexes
//!
//! See `engine.rs` for the full flow.

pub mod config;
pub mod engine;
pub mod error;

// Re-export main types for convenience
pub use config::{ConfigError, DispatchConfig};
pub use engine::{Dequeued, DispatchOrchestrator, Enqueued};
pub use error::DispatchError;
