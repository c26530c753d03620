//! In-memory key-value store
//!
//! Thread-safe implementation of [`KeyValueStore`] used by the CLI and the
//! test suite. Each table is a `BTreeMap` keyed by (partition, sort), so a
//! partition is a contiguous key range and a query is a range scan followed
//! by an ordering on the requested attribute.
//!
//! Tables must be created before use; calls against an unknown table fail
//! with [`StoreError::ResourceMissing`] exactly like a misconfigured remote
//! table would.

use super::{Condition, Item, ItemKey, KeyValueStore, RangeQuery, SortDirection, StoreError};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Table = BTreeMap<ItemKey, Item>;

/// Shared in-memory tables
///
/// # Example
/// ```
/// use atc_dispatch_core::store::{Condition, ItemKey, KeyValueStore, MemoryStore, StoreError};
///
/// let store = MemoryStore::with_tables(&["AircraftTable"]);
/// let key = ItemKey::partition("ac-1");
///
/// store.put("AircraftTable", key.clone(), Default::default(), Condition::KeyAbsent).unwrap();
/// let again = store.put("AircraftTable", key, Default::default(), Condition::KeyAbsent);
/// assert_eq!(again, Err(StoreError::ConditionFailed));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given (empty) tables
    pub fn with_tables(names: &[&str]) -> Self {
        let tables = names
            .iter()
            .map(|name| (name.to_string(), Table::new()))
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Create a table; no-op if it already exists
    pub fn create_table(&self, name: &str) -> Result<(), StoreError> {
        self.write()?.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Drop a table and everything in it
    pub fn drop_table(&self, name: &str) -> Result<(), StoreError> {
        self.write()?.remove(name);
        Ok(())
    }

    /// Number of items in a table
    pub fn item_count(&self, table: &str) -> Result<usize, StoreError> {
        let tables = self.read()?;
        Ok(lookup(&tables, table)?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Table>>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Table>>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

fn lookup<'a>(tables: &'a HashMap<String, Table>, name: &str) -> Result<&'a Table, StoreError> {
    tables.get(name).ok_or_else(|| StoreError::ResourceMissing {
        table: name.to_string(),
    })
}

fn lookup_mut<'a>(tables: &'a mut HashMap<String, Table>, name: &str) -> Result<&'a mut Table, StoreError> {
    tables.get_mut(name).ok_or_else(|| StoreError::ResourceMissing {
        table: name.to_string(),
    })
}

fn condition_holds(existing: Option<&Item>, condition: &Condition) -> bool {
    match condition {
        Condition::None => true,
        Condition::KeyAbsent => existing.is_none(),
        Condition::AttributePresent(name) => existing
            .and_then(|item| item.get(name))
            .map(|v| !v.is_null())
            .unwrap_or(false),
    }
}

/// Numbers compare numerically, strings lexicographically
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        let tables = self.read()?;
        Ok(lookup(&tables, table)?.get(key).cloned())
    }

    fn put(&self, table: &str, key: ItemKey, item: Item, condition: Condition) -> Result<Option<Item>, StoreError> {
        let mut tables = self.write()?;
        let rows = lookup_mut(&mut tables, table)?;

        if !condition_holds(rows.get(&key), &condition) {
            return Err(StoreError::ConditionFailed);
        }
        Ok(rows.insert(key, item))
    }

    fn delete(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        let mut tables = self.write()?;
        Ok(lookup_mut(&mut tables, table)?.remove(key))
    }

    fn query(&self, table: &str, query: &RangeQuery) -> Result<Vec<Item>, StoreError> {
        let tables = self.read()?;
        let rows = lookup(&tables, table)?;

        let start = ItemKey {
            partition: query.partition.clone(),
            sort: None,
        };
        let mut matches: Vec<(&Value, &Item)> = rows
            .range(start..)
            .take_while(|(key, _)| key.partition == query.partition)
            .filter_map(|(_, item)| item.get(&query.order_by).map(|v| (v, item)))
            .collect();

        // Stable sort: ties keep key order
        match query.direction {
            SortDirection::Ascending => matches.sort_by(|a, b| compare_values(a.0, b.0)),
            SortDirection::Descending => matches.sort_by(|a, b| compare_values(b.0, a.0)),
        }

        Ok(matches
            .into_iter()
            .take(query.limit)
            .map(|(_, item)| item.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            _ => panic!("test items must be objects"),
        }
    }

    #[test]
    fn test_missing_table_is_resource_missing() {
        let store = MemoryStore::new();
        let err = store.get("nope", &ItemKey::partition("a")).unwrap_err();
        assert_eq!(
            err,
            StoreError::ResourceMissing {
                table: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_put_returns_previous_item() {
        let store = MemoryStore::with_tables(&["t"]);
        let key = ItemKey::composite("IAD", "IAD-3070");

        let first = store
            .put("t", key.clone(), item(json!({"v": 1})), Condition::None)
            .unwrap();
        let second = store
            .put("t", key.clone(), item(json!({"v": 2})), Condition::None)
            .unwrap();

        assert_eq!(first, None);
        assert_eq!(second, Some(item(json!({"v": 1}))));
        assert_eq!(store.get("t", &key).unwrap(), Some(item(json!({"v": 2}))));
    }

    #[test]
    fn test_attribute_present_condition() {
        let store = MemoryStore::with_tables(&["t"]);
        let key = ItemKey::partition("ac-1");
        let cond = Condition::AttributePresent("priorityKey".to_string());

        // Absent item fails the condition
        assert_eq!(
            store.put("t", key.clone(), Item::new(), cond.clone()),
            Err(StoreError::ConditionFailed)
        );

        store
            .put("t", key.clone(), item(json!({"priorityKey": "IAD-3070"})), Condition::None)
            .unwrap();
        store
            .put("t", key.clone(), item(json!({"departed": true})), cond.clone())
            .unwrap();

        // Attribute gone now
        assert_eq!(
            store.put("t", key, Item::new(), cond),
            Err(StoreError::ConditionFailed)
        );
    }

    #[test]
    fn test_query_orders_numbers_numerically() {
        let store = MemoryStore::with_tables(&["t"]);
        for (sort, score) in [("IAD-7070", 7070), ("IAD-503070", 503_070), ("IAD-3030", 3030)] {
            store
                .put(
                    "t",
                    ItemKey::composite("IAD", sort),
                    item(json!({"priorityKey": sort, "priorityScore": score})),
                    Condition::None,
                )
                .unwrap();
        }

        let top = store
            .query(
                "t",
                &RangeQuery::first("IAD", "priorityScore", SortDirection::Descending),
            )
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0]["priorityKey"], "IAD-503070");
    }

    #[test]
    fn test_query_stays_in_partition_and_skips_sparse_items() {
        let store = MemoryStore::with_tables(&["t"]);
        store
            .put("t", ItemKey::composite("A", "1"), item(json!({"at": "2024-01-01T00:02Z"})), Condition::None)
            .unwrap();
        store
            .put("t", ItemKey::composite("A", "2"), item(json!({"at": "2024-01-01T00:01Z"})), Condition::None)
            .unwrap();
        store
            .put("t", ItemKey::composite("A", "3"), item(json!({"other": 1})), Condition::None)
            .unwrap();
        store
            .put("t", ItemKey::composite("B", "1"), item(json!({"at": "2023-01-01T00:00Z"})), Condition::None)
            .unwrap();

        let query = RangeQuery {
            partition: "A".to_string(),
            order_by: "at".to_string(),
            direction: SortDirection::Ascending,
            limit: 10,
        };
        let rows = store.query("t", &query).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["at"], "2024-01-01T00:01Z");
        assert_eq!(rows[1]["at"], "2024-01-01T00:02Z");
    }

    #[test]
    fn test_drop_table() {
        let store = MemoryStore::with_tables(&["t"]);
        assert_eq!(store.item_count("t").unwrap(), 0);
        store.drop_table("t").unwrap();
        assert!(matches!(
            store.item_count("t"),
            Err(StoreError::ResourceMissing { .. })
        ));
    }
}
