//! Airport dispatch index
//!
//! One representative row per (airport, priority key), ordered by the
//! numeric score embedded in the key. Ordering on the score rather than on
//! the key string matters: `"IAD-503070" < "IAD-7070"` as strings, but the
//! emergency must come first.

use super::{from_item, to_item, Condition, ItemKey, KeyValueStore, RangeQuery, SortDirection, StoreError};
use crate::core::time::ArrivalTime;
use crate::models::index_entry::AirportIndexEntry;
use crate::models::priority::PriorityKey;
use serde_json::Value;
use std::sync::Arc;

const SCORE_ATTR: &str = "priorityScore";

/// Per-airport ordered set of priority keys
pub trait AirportDispatchIndex: Send + Sync {
    /// Overwrite the representative entry (last writer wins)
    fn upsert(&self, airport_code: &str, priority_key: &str, arrival_time: ArrivalTime) -> Result<(), StoreError>;

    /// Highest-priority entry for the airport, `None` if nothing is queued
    fn peek_top(&self, airport_code: &str) -> Result<Option<AirportIndexEntry>, StoreError>;

    /// Delete the representative entry, returning it if it existed
    fn remove(&self, airport_code: &str, priority_key: &str) -> Result<Option<AirportIndexEntry>, StoreError>;
}

/// [`AirportDispatchIndex`] backed by a key-value table
pub struct TableAirportIndex {
    store: Arc<dyn KeyValueStore>,
    table: String,
}

impl TableAirportIndex {
    pub fn new(store: Arc<dyn KeyValueStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }
}

impl AirportDispatchIndex for TableAirportIndex {
    fn upsert(&self, airport_code: &str, priority_key: &str, arrival_time: ArrivalTime) -> Result<(), StoreError> {
        let score = priority_key
            .parse::<PriorityKey>()
            .map_err(|e| StoreError::Malformed {
                table: self.table.clone(),
                reason: e.to_string(),
            })?
            .score();

        let entry = AirportIndexEntry {
            airport_code: airport_code.to_string(),
            priority_key: priority_key.to_string(),
            arrival_time,
        };
        let mut item = to_item(&self.table, &entry)?;
        item.insert(SCORE_ATTR.to_string(), Value::from(score));

        self.store.put(
            &self.table,
            ItemKey::composite(airport_code, priority_key),
            item,
            Condition::None,
        )?;
        Ok(())
    }

    fn peek_top(&self, airport_code: &str) -> Result<Option<AirportIndexEntry>, StoreError> {
        let query = RangeQuery::first(airport_code, SCORE_ATTR, SortDirection::Descending);
        self.store
            .query(&self.table, &query)?
            .into_iter()
            .next()
            .map(|item| from_item(&self.table, item))
            .transpose()
    }

    fn remove(&self, airport_code: &str, priority_key: &str) -> Result<Option<AirportIndexEntry>, StoreError> {
        self.store
            .delete(&self.table, &ItemKey::composite(airport_code, priority_key))?
            .map(|item| from_item(&self.table, item))
            .transpose()
    }
}
