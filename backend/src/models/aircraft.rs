//! Aircraft model
//!
//! Represents an aircraft waiting to land at an airport.
//! Each aircraft has:
//! - An opaque unique id (generated by the store, never reused)
//! - The airport it is queued at (always upper-cased)
//! - Type, size and an optional special flag, which together fix its priority
//! - The derived priority key (cleared once the aircraft is dequeued)
//! - Arrival time, and a departure time once dequeued
//!
//! Field names on the wire are camelCase (`aircraftId`, `arrivalTime`, ...)
//! and enum values are the upper-case names (`VIP`, `LARGE`, `EMERGENCY`).

use crate::core::time::ArrivalTime;
use serde::{Deserialize, Serialize};

/// Kind of aircraft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AircraftType {
    Vip,
    Passenger,
    Cargo,
}

impl AircraftType {
    /// Priority weight contributed by the type
    pub fn weight(&self) -> u32 {
        match self {
            AircraftType::Cargo => 3_000,
            AircraftType::Passenger => 5_000,
            AircraftType::Vip => 7_000,
        }
    }
}

/// Airframe size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AircraftSize {
    Large,
    Small,
}

impl AircraftSize {
    /// Priority weight contributed by the size
    pub fn weight(&self) -> u32 {
        match self {
            AircraftSize::Small => 30,
            AircraftSize::Large => 70,
        }
    }
}

/// Special handling flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AircraftSpecialFlag {
    Emergency,
    Normal,
}

impl AircraftSpecialFlag {
    /// Priority weight contributed by the flag
    ///
    /// Dwarfs every type/size combination so an emergency always lands first.
    pub fn weight(&self) -> u32 {
        match self {
            AircraftSpecialFlag::Normal => 0,
            AircraftSpecialFlag::Emergency => 500_000,
        }
    }
}

/// Payload of a create request
///
/// Every field is optional because this is the shape that arrives over the
/// wire; the orchestrator rejects requests missing a required field before
/// touching the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAircraftRequest {
    #[serde(default)]
    pub airport_code: Option<String>,
    #[serde(default)]
    pub aircraft_type: Option<AircraftType>,
    #[serde(default)]
    pub aircraft_size: Option<AircraftSize>,
    #[serde(default)]
    pub aircraft_special_flag: Option<AircraftSpecialFlag>,
}

impl CreateAircraftRequest {
    /// Request with the three required fields set
    ///
    /// # Example
    /// ```
    /// use atc_dispatch_core::models::{AircraftSize, AircraftType, CreateAircraftRequest};
    ///
    /// let request = CreateAircraftRequest::new("iad", AircraftType::Cargo, AircraftSize::Large);
    /// assert_eq!(request.airport_code.as_deref(), Some("iad"));
    /// assert!(request.aircraft_special_flag.is_none());
    /// ```
    pub fn new(airport_code: impl Into<String>, aircraft_type: AircraftType, aircraft_size: AircraftSize) -> Self {
        Self {
            airport_code: Some(airport_code.into()),
            aircraft_type: Some(aircraft_type),
            aircraft_size: Some(aircraft_size),
            aircraft_special_flag: None,
        }
    }

    /// Set the special flag (builder pattern)
    pub fn with_special_flag(mut self, flag: AircraftSpecialFlag) -> Self {
        self.aircraft_special_flag = Some(flag);
        self
    }
}

/// A validated aircraft that has not been assigned an id yet
///
/// Built by the orchestrator and handed to the store, which owns id
/// generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAircraft {
    pub airport_code: String,
    pub aircraft_type: AircraftType,
    pub aircraft_size: AircraftSize,
    pub aircraft_special_flag: Option<AircraftSpecialFlag>,
    pub priority_key: String,
    pub arrival_time: ArrivalTime,
}

impl NewAircraft {
    /// Attach the id chosen by the store
    pub fn with_id(self, aircraft_id: String) -> Aircraft {
        Aircraft {
            aircraft_id,
            airport_code: self.airport_code,
            aircraft_type: self.aircraft_type,
            aircraft_size: self.aircraft_size,
            aircraft_special_flag: self.aircraft_special_flag,
            priority_key: Some(self.priority_key),
            arrival_time: self.arrival_time,
            departure_time: None,
        }
    }
}

/// Persisted aircraft record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    /// Unique aircraft identifier
    pub aircraft_id: String,

    /// Airport code, upper-cased on write
    pub airport_code: String,

    pub aircraft_type: AircraftType,

    pub aircraft_size: AircraftSize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft_special_flag: Option<AircraftSpecialFlag>,

    /// Derived priority key
    ///
    /// - `Some(key)`: aircraft is queued
    /// - `None`: aircraft has been dequeued (tombstone)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_key: Option<String>,

    pub arrival_time: ArrivalTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<ArrivalTime>,
}

impl Aircraft {
    /// Whether the aircraft is still waiting in a queue
    pub fn is_queued(&self) -> bool {
        self.priority_key.is_some()
    }
}
