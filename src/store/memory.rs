//! In-process [`Store`] implementation.
//!
//! Backs the integration tests and any caller exercising the repositories
//! without a real engine. Each table keeps its own row vector and monotonic
//! sequence counter, mirroring the `ID INTEGER` / `SEQ_<table>` shape of the
//! relational schema. The handle can be flipped offline to exercise
//! persistence-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{DocumentTable, Store, StoreError, StoredDocument};

#[derive(Debug, Default)]
struct TableState {
    next_id: i64,
    rows: Vec<StoredDocument>,
}

/// Mutex-guarded store double with per-table sequences starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<DocumentTable, TableState>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with a connection error, so
    /// callers can observe how repositories surface store failures.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store is offline".to_string()));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn insert(&self, table: DocumentTable, xml: &str) -> Result<i64, StoreError> {
        self.check_online()?;
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Connection("store lock poisoned".to_string()))?;
        let state = tables.entry(table).or_default();
        state.next_id += 1;
        let id = state.next_id;
        state.rows.push(StoredDocument {
            id,
            xml: xml.to_string(),
        });
        Ok(id)
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.check_online()
    }

    fn select_all(&self, table: DocumentTable) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_online()?;
        let tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Connection("store lock poisoned".to_string()))?;
        let mut rows = tables
            .get(&table)
            .map(|state| state.rows.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    fn select_by_id(
        &self,
        table: DocumentTable,
        id: i64,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.check_online()?;
        let tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Connection("store lock poisoned".to_string()))?;
        Ok(tables
            .get(&table)
            .and_then(|state| state.rows.iter().find(|row| row.id == id).cloned()))
    }

    fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}
