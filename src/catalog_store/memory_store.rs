//! In-process row store.
//!
//! Rows live in per-table vectors behind a single mutex. A read-write
//! transaction holds the lock for its whole lifetime and works on a copy of
//! the tables, which replaces the shared state only on commit.

use super::error::{StoreError, StoreResult};
use super::trait_def::{Field, Row, RowStore, RowTransaction, TableName};
use std::cell::RefCell;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Debug, Default)]
struct MemoryTables {
    artists: Vec<Row>,
    albums: Vec<Row>,
    tracks: Vec<Row>,
}

impl MemoryTables {
    fn table(&self, table: TableName) -> &Vec<Row> {
        match table {
            TableName::Artists => &self.artists,
            TableName::Albums => &self.albums,
            TableName::Tracks => &self.tracks,
        }
    }

    fn table_mut(&mut self, table: TableName) -> &mut Vec<Row> {
        match table {
            TableName::Artists => &mut self.artists,
            TableName::Albums => &mut self.albums,
            TableName::Tracks => &mut self.tracks,
        }
    }
}

#[derive(Default)]
pub struct MemoryRowStore {
    tables: Mutex<MemoryTables>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemoryRowStore {
    fn begin(&self) -> StoreResult<Box<dyn RowTransaction + '_>> {
        let guard = self.tables.lock()?;
        let working = RefCell::new(guard.clone());
        Ok(Box::new(MemoryTransaction {
            guard: Some(guard),
            working,
        }))
    }

    fn begin_read(&self) -> StoreResult<Box<dyn RowTransaction + '_>> {
        let snapshot = self.tables.lock()?.clone();
        Ok(Box::new(MemoryTransaction {
            guard: None,
            working: RefCell::new(snapshot),
        }))
    }
}

/// `guard` is `None` for read-only snapshots.
struct MemoryTransaction<'a> {
    guard: Option<MutexGuard<'a, MemoryTables>>,
    working: RefCell<MemoryTables>,
}

impl MemoryTransaction<'_> {
    fn check_writable(&self) -> StoreResult<()> {
        match self.guard {
            Some(_) => Ok(()),
            None => Err(StoreError::ReadOnly),
        }
    }
}

impl RowTransaction for MemoryTransaction<'_> {
    fn get_by_key(&self, table: TableName, id: &str) -> StoreResult<Option<Row>> {
        Ok(self
            .working
            .borrow()
            .table(table)
            .iter()
            .find(|row| row.id() == id)
            .cloned())
    }

    fn get_where(&self, table: TableName, field: Field, value: &str) -> StoreResult<Vec<Row>> {
        field.check(table)?;
        Ok(self
            .working
            .borrow()
            .table(table)
            .iter()
            .filter(|row| row.field(field) == Some(value))
            .cloned()
            .collect())
    }

    fn get_all(&self, table: TableName) -> StoreResult<Vec<Row>> {
        Ok(self.working.borrow().table(table).clone())
    }

    fn insert(&self, row: &Row) -> StoreResult<()> {
        self.check_writable()?;
        let mut tables = self.working.borrow_mut();
        let rows = tables.table_mut(row.table());
        if rows.iter().any(|existing| existing.id() == row.id()) {
            return Err(StoreError::KeyViolation {
                table: row.table(),
                id: row.id().to_string(),
            });
        }
        rows.push(row.clone());
        Ok(())
    }

    fn update(&self, row: &Row) -> StoreResult<bool> {
        self.check_writable()?;
        let mut tables = self.working.borrow_mut();
        match tables
            .table_mut(row.table())
            .iter_mut()
            .find(|existing| existing.id() == row.id())
        {
            Some(existing) => {
                *existing = row.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, table: TableName, id: &str) -> StoreResult<bool> {
        self.check_writable()?;
        let mut tables = self.working.borrow_mut();
        let rows = tables.table_mut(table);
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() != before)
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { guard, working } = *self;
        if let Some(mut guard) = guard {
            *guard = working.into_inner();
        }
        Ok(())
    }
}
