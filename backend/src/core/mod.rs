//! Core utilities shared by every layer

pub mod time;

pub use time::{ArrivalClock, ArrivalTime, ManualClock, SystemClock, TimeParseError};
