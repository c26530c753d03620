//! Arrival time management
//!
//! Aircraft arrivals are recorded at minute resolution in UTC. The string
//! form (`yyyy-MM-ddTHH:mmZ`) is what gets persisted, and because every
//! field is zero-padded its lexicographic order matches chronological order.
//! The priority index relies on that when it asks the store for the oldest
//! arrival.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Wire format for arrival and departure timestamps
pub const ARRIVAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Errors raised while parsing a timestamp
#[derive(Debug, Error, PartialEq)]
pub enum TimeParseError {
    #[error("Timestamp '{0}' is not in yyyy-MM-ddTHH:mmZ format")]
    InvalidFormat(String),
}

/// UTC instant truncated to the minute
///
/// # Example
/// ```
/// use atc_dispatch_core::ArrivalTime;
///
/// let t: ArrivalTime = "2024-03-01T09:15Z".parse().unwrap();
/// assert_eq!(t.to_string(), "2024-03-01T09:15Z");
/// assert!(t < t.plus_minutes(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrivalTime(DateTime<Utc>);

impl ArrivalTime {
    /// Truncate an instant to minute resolution
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let truncated = instant
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(instant);
        Self(truncated)
    }

    /// Build from calendar fields, `None` if they do not form a valid instant
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .map(Self)
    }

    /// Instant `minutes` later
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Underlying chrono value
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for ArrivalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ARRIVAL_TIME_FORMAT))
    }
}

impl FromStr for ArrivalTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, ARRIVAL_TIME_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))
    }
}

impl Serialize for ArrivalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArrivalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of arrival timestamps
///
/// The orchestrator never reads the wall clock directly, so runs can be
/// replayed with a [`ManualClock`].
pub trait ArrivalClock: Send + Sync {
    /// Current instant at minute resolution
    fn now(&self) -> ArrivalTime;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ArrivalClock for SystemClock {
    fn now(&self) -> ArrivalTime {
        ArrivalTime::from_datetime(Utc::now())
    }
}

/// Clock that only moves when told to
///
/// # Example
/// ```
/// use atc_dispatch_core::{ArrivalClock, ArrivalTime, ManualClock};
///
/// let start = ArrivalTime::from_ymd_hm(2024, 3, 1, 9, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance_minutes(5);
/// assert_eq!(clock.now().to_string(), "2024-03-01T09:05Z");
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<ArrivalTime>,
}

impl ManualClock {
    pub fn new(start: ArrivalTime) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance_minutes(&self, minutes: i64) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *current = current.plus_minutes(minutes);
    }

    /// Jump to an explicit instant
    pub fn set(&self, instant: ArrivalTime) {
        *self.current.lock().unwrap_or_else(|p| p.into_inner()) = instant;
    }
}

impl ArrivalClock for ManualClock {
    fn now(&self) -> ArrivalTime {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}
