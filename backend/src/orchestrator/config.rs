//! Dispatch configuration
//!
//! Table names are the only wiring the core needs. They default to the names
//! the service has always used and can be overridden from the environment:
//!
//! | Variable                       | Default                   |
//! |--------------------------------|---------------------------|
//! | `AIRCRAFT_TABLE_NAME`          | `AircraftTable`           |
//! | `PRIORITY_AIRCRAFT_TABLE_NAME` | `priority_aircraft_table` |
//! | `AIRPORT_QUEUE_TABLE_NAME`     | same as priority table    |

use thiserror::Error;

pub const AIRCRAFT_TABLE_ENV: &str = "AIRCRAFT_TABLE_NAME";
pub const PRIORITY_TABLE_ENV: &str = "PRIORITY_AIRCRAFT_TABLE_NAME";
pub const AIRPORT_TABLE_ENV: &str = "AIRPORT_QUEUE_TABLE_NAME";

pub const DEFAULT_AIRCRAFT_TABLE: &str = "AircraftTable";
pub const DEFAULT_PRIORITY_TABLE: &str = "priority_aircraft_table";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Table name for {0} must not be empty")]
    EmptyTableName(&'static str),
}

/// Where the three dispatch structures live
///
/// The priority and airport indexes may share a table: airport partitions
/// are bare alphanumeric codes (`IAD`, enforced by the orchestrator) while
/// priority partitions always carry a `-score` suffix (`IAD-3070`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Primary aircraft records
    pub aircraft_table: String,

    /// Priority index (priority key → aircraft)
    pub priority_table: String,

    /// Airport index (airport → priority keys)
    pub airport_table: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            aircraft_table: DEFAULT_AIRCRAFT_TABLE.to_string(),
            priority_table: DEFAULT_PRIORITY_TABLE.to_string(),
            airport_table: DEFAULT_PRIORITY_TABLE.to_string(),
        }
    }
}

impl DispatchConfig {
    /// Read table names from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read table names through an arbitrary lookup (unset or empty → default)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let aircraft_table = get(AIRCRAFT_TABLE_ENV).unwrap_or_else(|| DEFAULT_AIRCRAFT_TABLE.to_string());
        let priority_table = get(PRIORITY_TABLE_ENV).unwrap_or_else(|| DEFAULT_PRIORITY_TABLE.to_string());
        let airport_table = get(AIRPORT_TABLE_ENV).unwrap_or_else(|| priority_table.clone());

        Self {
            aircraft_table,
            priority_table,
            airport_table,
        }
    }

    /// Reject empty table names
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aircraft_table.trim().is_empty() {
            return Err(ConfigError::EmptyTableName("aircraft records"));
        }
        if self.priority_table.trim().is_empty() {
            return Err(ConfigError::EmptyTableName("priority index"));
        }
        if self.airport_table.trim().is_empty() {
            return Err(ConfigError::EmptyTableName("airport index"));
        }
        Ok(())
    }

    /// Distinct table names, in declaration order
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(3);
        for name in [&self.aircraft_table, &self.priority_table, &self.airport_table] {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        names
    }
}
