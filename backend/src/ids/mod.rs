//! Aircraft id generation
//!
//! Ids are opaque strings. The store treats a collision as an expected
//! outcome and asks the generator for a fresh id, so generators only need to
//! make collisions rare, not impossible.

mod generator;

pub use generator::{IdGenerator, SequentialIdGenerator, UuidGenerator};
