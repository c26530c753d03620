//! Key-value store boundary
//!
//! The dispatch queue sits on a networked key-value store with the usual
//! single-item guarantees and nothing more:
//!
//! - get an item by key
//! - put an item, optionally conditioned on the key being absent or an
//!   attribute being present (the only atomicity the store offers)
//! - delete an item
//! - query one partition ordered by an attribute, ascending or descending,
//!   with a result limit
//!
//! There are no multi-item transactions. The three structures built on top
//! (aircraft records, priority index, airport index) are kept loosely
//! consistent by the orchestrator.
//!
//! # Error Classification
//!
//! Core code only distinguishes [`StoreError::ResourceMissing`] (a table is
//! absent: fatal configuration fault, never retried) from
//! [`StoreError::ConditionFailed`] (expected, drives id regeneration).
//! Everything else is surfaced as-is.

pub mod aircraft;
pub mod airport_index;
pub mod memory;
pub mod priority_index;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use aircraft::{AircraftStore, InsertError, InsertOutcome, StoredAircraft, TableAircraftStore, MAX_CREATE_ATTEMPTS};
pub use airport_index::{AirportDispatchIndex, TableAirportIndex};
pub use memory::MemoryStore;
pub use priority_index::{PriorityIndex, TablePriorityIndex};

/// Attribute map making up one stored item
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Errors returned by a [`KeyValueStore`]
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Table {table} does not exist")]
    ResourceMissing { table: String },

    #[error("Conditional write failed")]
    ConditionFailed,

    /// Transient backend failure (timeout, lost connection, poisoned lock)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed item in table {table}: {reason}")]
    Malformed { table: String, reason: String },
}

/// Primary key of an item: partition plus optional sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub partition: String,
    pub sort: Option<String>,
}

impl ItemKey {
    /// Key for a table without a sort key
    pub fn partition(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    /// Composite key
    pub fn composite(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

/// Guard evaluated atomically with a put
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Unconditional overwrite
    None,

    /// Insert-if-absent
    KeyAbsent,

    /// Item exists and carries the named attribute
    AttributePresent(String),
}

/// Sort direction for a range query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordered read of one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub partition: String,
    /// Attribute to order by; items without it are not returned
    pub order_by: String,
    pub direction: SortDirection,
    pub limit: usize,
}

impl RangeQuery {
    /// First item of a partition in the given order
    pub fn first(partition: impl Into<String>, order_by: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            partition: partition.into(),
            order_by: order_by.into(),
            direction,
            limit: 1,
        }
    }
}

/// Networked key-value store
///
/// Implementations must be safe to share between threads; every call is an
/// independent request with single-item atomicity.
pub trait KeyValueStore: Send + Sync {
    /// Read one item
    fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError>;

    /// Write one item if `condition` holds, returning the item it replaced
    fn put(&self, table: &str, key: ItemKey, item: Item, condition: Condition) -> Result<Option<Item>, StoreError>;

    /// Delete one item, returning it if it existed
    fn delete(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError>;

    /// Ordered read within one partition
    fn query(&self, table: &str, query: &RangeQuery) -> Result<Vec<Item>, StoreError>;
}

/// Encode a record as an item
pub(crate) fn to_item<T: Serialize>(table: &str, value: &T) -> Result<Item, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Malformed {
            table: table.to_string(),
            reason: format!("expected an object, got {}", other),
        }),
        Err(e) => Err(StoreError::Malformed {
            table: table.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Decode an item into a record
pub(crate) fn from_item<T: DeserializeOwned>(table: &str, item: Item) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(item)).map_err(|e| StoreError::Malformed {
        table: table.to_string(),
        reason: e.to_string(),
    })
}
