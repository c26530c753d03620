//! Priority index
//!
//! One row per queued aircraft, partitioned by priority key and ordered by
//! arrival time, so the oldest aircraft in a priority group is the first row
//! of an ascending query.

use super::{from_item, to_item, Condition, ItemKey, KeyValueStore, RangeQuery, SortDirection, StoreError};
use crate::core::time::ArrivalTime;
use crate::models::index_entry::PriorityIndexEntry;
use std::sync::Arc;

const ARRIVAL_ATTR: &str = "arrivalTime";

/// Per-priority-key ordered set of aircraft
pub trait PriorityIndex: Send + Sync {
    /// Record an aircraft under its priority key
    fn add(&self, priority_key: &str, aircraft_id: &str, arrival_time: ArrivalTime) -> Result<(), StoreError>;

    /// Earliest-arrived aircraft for the key, `None` if the group is empty
    fn peek_oldest(&self, priority_key: &str) -> Result<Option<PriorityIndexEntry>, StoreError>;

    /// Delete an entry, returning it if it existed
    fn remove(&self, priority_key: &str, aircraft_id: &str) -> Result<Option<PriorityIndexEntry>, StoreError>;
}

/// [`PriorityIndex`] backed by a key-value table
pub struct TablePriorityIndex {
    store: Arc<dyn KeyValueStore>,
    table: String,
}

impl TablePriorityIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }
}

impl PriorityIndex for TablePriorityIndex {
    fn add(&self, priority_key: &str, aircraft_id: &str, arrival_time: ArrivalTime) -> Result<(), StoreError> {
        let entry = PriorityIndexEntry {
            priority_key: priority_key.to_string(),
            aircraft_id: aircraft_id.to_string(),
            arrival_time,
        };
        let item = to_item(&self.table, &entry)?;
        self.store.put(
            &self.table,
            ItemKey::composite(priority_key, aircraft_id),
            item,
            Condition::None,
        )?;
        Ok(())
    }

    fn peek_oldest(&self, priority_key: &str) -> Result<Option<PriorityIndexEntry>, StoreError> {
        let query = RangeQuery::first(priority_key, ARRIVAL_ATTR, SortDirection::Ascending);
        self.store
            .query(&self.table, &query)?
            .into_iter()
            .next()
            .map(|item| from_item(&self.table, item))
            .transpose()
    }

    fn remove(&self, priority_key: &str, aircraft_id: &str) -> Result<Option<PriorityIndexEntry>, StoreError> {
        self.store
            .delete(&self.table, &ItemKey::composite(priority_key, aircraft_id))?
            .map(|item| from_item(&self.table, item))
            .transpose()
    }
}
