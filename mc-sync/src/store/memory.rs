use std::collections::HashMap;

use parking_lot::Mutex;

use super::{LibraryStore, Row, SqlValue, Table};
use crate::error::StoreError;
use crate::task::{HostId, SyncKind};

/// In-process store, mainly for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<(HostId, Table), Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryStore for MemoryStore {
    fn delete_kind(&self, host: &HostId, kind: SyncKind) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        for table in Table::of_kind(kind) {
            tables.remove(&(host.clone(), table));
        }
        Ok(())
    }

    fn delete_entity(&self, host: &HostId, kind: SyncKind, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        for table in Table::of_kind(kind) {
            if let Some(rows) = tables.get_mut(&(host.clone(), table)) {
                let column = table.entity_column();
                rows.retain(|row| row.get(column).and_then(SqlValue::as_i64) != Some(id));
            }
        }
        Ok(())
    }

    fn insert(&self, host: &HostId, rows: &[Row]) -> Result<(), StoreError> {
        for row in rows {
            row.check_shape()?;
        }
        let mut tables = self.tables.lock();
        for row in rows {
            tables
                .entry((host.clone(), row.table))
                .or_default()
                .push(row.clone());
        }
        Ok(())
    }

    fn update(
        &self,
        host: &HostId,
        table: Table,
        id: i64,
        values: &[(&'static str, SqlValue)],
    ) -> Result<(), StoreError> {
        let mut indices = Vec::with_capacity(values.len());
        for (column, value) in values {
            let index = table.column_index(column).ok_or(StoreError::UnknownColumn {
                table: table.name(),
                column: *column,
            })?;
            indices.push((index, value));
        }

        let mut tables = self.tables.lock();
        if let Some(rows) = tables.get_mut(&(host.clone(), table)) {
            for row in rows.iter_mut().filter(|row| row.key() == Some(id)) {
                for (index, value) in &indices {
                    row.values[*index] = (*value).clone();
                }
            }
        }
        Ok(())
    }

    fn rows(&self, host: &HostId, table: Table) -> Result<Vec<Row>, StoreError> {
        Ok(self
            .tables
            .lock()
            .get(&(host.clone(), table))
            .cloned()
            .unwrap_or_default())
    }
}
