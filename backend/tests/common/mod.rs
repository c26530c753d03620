//! Shared fixtures for integration tests
#![allow(dead_code)]

use atc_dispatch_core::store::{Condition, Item, ItemKey, KeyValueStore, MemoryStore, RangeQuery, StoreError};
use atc_dispatch_core::{ArrivalTime, DispatchConfig, DispatchOrchestrator, IdGenerator, ManualClock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const AIRCRAFT_TABLE: &str = "AircraftTable";
pub const PRIORITY_TABLE: &str = "priority_aircraft_table";
pub const AIRPORT_TABLE: &str = "airport_queue_table";

/// Config with each structure in its own table, so faults can target one
pub fn split_config() -> DispatchConfig {
    DispatchConfig {
        aircraft_table: AIRCRAFT_TABLE.to_string(),
        priority_table: PRIORITY_TABLE.to_string(),
        airport_table: AIRPORT_TABLE.to_string(),
    }
}

pub fn start_time() -> ArrivalTime {
    ArrivalTime::from_ymd_hm(2024, 3, 15, 14, 0).unwrap()
}

/// Ids handed out in script order, then `fallback-N`
pub struct ScriptedIds {
    script: Mutex<VecDeque<String>>,
    fallback: AtomicUsize,
}

impl ScriptedIds {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            script: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            fallback: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for ScriptedIds {
    fn next_id(&self) -> String {
        if let Some(id) = self.script.lock().unwrap().pop_front() {
            return id;
        }
        format!("fallback-{}", self.fallback.fetch_add(1, Ordering::SeqCst))
    }
}

/// Store operation kinds a fault can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Put,
    Delete,
    Query,
}

/// [`MemoryStore`] wrapper that fails chosen operations on chosen tables
pub struct FaultyStore {
    inner: MemoryStore,
    faults: Mutex<Vec<(String, Op, StoreError)>>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            faults: Mutex::new(Vec::new()),
        }
    }

    /// Fail every `op` against `table` with `error` from now on
    pub fn fail(&self, table: &str, op: Op, error: StoreError) {
        self.faults.lock().unwrap().push((table.to_string(), op, error));
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, table: &str, op: Op) -> Result<(), StoreError> {
        let faults = self.faults.lock().unwrap();
        match faults.iter().find(|(t, o, _)| t == table && *o == op) {
            Some((_, _, error)) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl KeyValueStore for FaultyStore {
    fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        self.check(table, Op::Get)?;
        self.inner.get(table, key)
    }

    fn put(&self, table: &str, key: ItemKey, item: Item, condition: Condition) -> Result<Option<Item>, StoreError> {
        self.check(table, Op::Put)?;
        self.inner.put(table, key, item, condition)
    }

    fn delete(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        self.check(table, Op::Delete)?;
        self.inner.delete(table, key)
    }

    fn query(&self, table: &str, query: &RangeQuery) -> Result<Vec<Item>, StoreError> {
        self.check(table, Op::Query)?;
        self.inner.query(table, query)
    }
}

/// [`MemoryStore`] wrapper counting mutating calls
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.puts.load(Ordering::SeqCst) + self.deletes.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        self.inner.get(table, key)
    }

    fn put(&self, table: &str, key: ItemKey, item: Item, condition: Condition) -> Result<Option<Item>, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(table, key, item, condition)
    }

    fn delete(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(table, key)
    }

    fn query(&self, table: &str, query: &RangeQuery) -> Result<Vec<Item>, StoreError> {
        self.inner.query(table, query)
    }
}

/// Orchestrator over an arbitrary store with a manual clock
pub fn orchestrator_over(
    store: Arc<dyn KeyValueStore>,
    config: &DispatchConfig,
    ids: Arc<dyn IdGenerator>,
) -> (DispatchOrchestrator, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let orchestrator = DispatchOrchestrator::with_store(store, config, ids, clock.clone()).unwrap();
    (orchestrator, clock)
}

/// Orchestrator over a fresh in-memory store with all tables created
pub fn memory_orchestrator(ids: Arc<dyn IdGenerator>) -> (DispatchOrchestrator, Arc<MemoryStore>, Arc<ManualClock>) {
    let config = split_config();
    let store = Arc::new(MemoryStore::with_tables(&config.table_names()));
    let (orchestrator, clock) = orchestrator_over(store.clone(), &config, ids);
    (orchestrator, store, clock)
}
