//! Landing priority calculation
//!
//! A priority key combines the airport with a numeric score:
//!
//! ```text
//! score = type weight + size weight + flag weight
//! key   = UPPER(airport) + "-" + score        e.g. "IAD-3070"
//! ```
//!
//! Weights: CARGO 3000, PASSENGER 5000, VIP 7000; SMALL 30, LARGE 70;
//! NORMAL/absent 0, EMERGENCY 500000. A larger score dispatches first.

use crate::models::aircraft::{AircraftSize, AircraftSpecialFlag, AircraftType};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a stored priority key
#[derive(Debug, Error, PartialEq)]
pub enum PriorityKeyError {
    #[error("Priority key '{0}' has no '-<score>' suffix")]
    MissingScore(String),

    #[error("Priority key '{0}' has a non-numeric score")]
    InvalidScore(String),
}

/// Per-airport ordering key
///
/// Ordered by score only; keys from different airports never meet in the
/// same index partition.
///
/// # Example
/// ```
/// use atc_dispatch_core::models::{AircraftSize, AircraftType, PriorityKey};
///
/// let key = PriorityKey::compute("iad", AircraftType::Cargo, AircraftSize::Large, None);
/// assert_eq!(key.to_string(), "IAD-3070");
/// assert_eq!(key.score(), 3070);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriorityKey {
    airport_code: String,
    score: u32,
}

impl PriorityKey {
    /// Compute the key for an aircraft (pure, deterministic)
    pub fn compute(
        airport_code: &str,
        aircraft_type: AircraftType,
        aircraft_size: AircraftSize,
        special_flag: Option<AircraftSpecialFlag>,
    ) -> Self {
        let flag_weight = special_flag.map(|f| f.weight()).unwrap_or(0);
        Self {
            airport_code: airport_code.to_uppercase(),
            score: aircraft_type.weight() + aircraft_size.weight() + flag_weight,
        }
    }

    pub fn airport_code(&self) -> &str {
        &self.airport_code
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

impl fmt::Display for PriorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.airport_code, self.score)
    }
}

impl FromStr for PriorityKey {
    type Err = PriorityKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the last '-' so airport codes containing '-' still parse
        let (airport, score) = s
            .rsplit_once('-')
            .ok_or_else(|| PriorityKeyError::MissingScore(s.to_string()))?;
        let score = score
            .parse::<u32>()
            .map_err(|_| PriorityKeyError::InvalidScore(s.to_string()))?;

        Ok(Self {
            airport_code: airport.to_string(),
            score,
        })
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.airport_code.cmp(&other.airport_code))
    }
}
