use std::path::Path;

use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, ToSql};

use super::{LibraryStore, Row, SqlValue, Table};
use crate::error::StoreError;
use crate::task::{HostId, SyncKind};

/// SQLite-backed store, one table per [`Table`] plus a `host` scope column
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        for table in Table::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (host TEXT NOT NULL, {})",
                table.name(),
                table.columns().join(", ")
            );
            conn.execute(&sql, [])?;

            let sql = format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_host ON {} (host, {})",
                table.name(),
                table.name(),
                table.entity_column()
            );
            conn.execute(&sql, [])?;
        }
        tracing::debug!("Library store schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            SqlValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

fn from_sql(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(v) | ValueRef::Blob(v) => SqlValue::Text(String::from_utf8_lossy(v).into_owned()),
    }
}

impl LibraryStore for SqliteStore {
    fn delete_kind(&self, host: &HostId, kind: SyncKind) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for table in Table::of_kind(kind) {
            let sql = format!("DELETE FROM {} WHERE host = ?1", table.name());
            tx.execute(&sql, [host.as_str()])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_entity(&self, host: &HostId, kind: SyncKind, id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for table in Table::of_kind(kind) {
            let sql = format!(
                "DELETE FROM {} WHERE host = ?1 AND {} = ?2",
                table.name(),
                table.entity_column()
            );
            tx.execute(&sql, rusqlite::params![host.as_str(), id])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert(&self, host: &HostId, rows: &[Row]) -> Result<(), StoreError> {
        for row in rows {
            row.check_shape()?;
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let host = host.as_str();
            for row in rows {
                let columns = row.table.columns();
                let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} (host, {}) VALUES ({})",
                    row.table.name(),
                    columns.join(", "),
                    placeholders.join(", ")
                );
                let mut stmt = tx.prepare_cached(&sql)?;
                let mut params: Vec<&dyn ToSql> = Vec::with_capacity(row.values.len() + 1);
                params.push(&host);
                params.extend(row.values.iter().map(|v| v as &dyn ToSql));
                stmt.execute(params.as_slice())?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn update(
        &self,
        host: &HostId,
        table: Table,
        id: i64,
        values: &[(&'static str, SqlValue)],
    ) -> Result<(), StoreError> {
        if values.is_empty() {
            return Ok(());
        }

        let mut assignments = Vec::with_capacity(values.len());
        for (i, (column, _)) in values.iter().enumerate() {
            if table.column_index(column).is_none() {
                return Err(StoreError::UnknownColumn {
                    table: table.name(),
                    column: *column,
                });
            }
            assignments.push(format!("{} = ?{}", column, i + 3));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE host = ?1 AND {} = ?2",
            table.name(),
            assignments.join(", "),
            table.key_column()
        );
        let host = host.as_str();
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(values.len() + 2);
        params.push(&host);
        params.push(&id);
        params.extend(values.iter().map(|(_, v)| v as &dyn ToSql));

        self.conn.lock().execute(&sql, params.as_slice())?;
        Ok(())
    }

    fn rows(&self, host: &HostId, table: Table) -> Result<Vec<Row>, StoreError> {
        let conn = self.conn.lock();
        let columns = table.columns();
        let sql = format!(
            "SELECT {} FROM {} WHERE host = ?1 ORDER BY rowid",
            columns.join(", "),
            table.name()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([host.as_str()], |row| {
                let mut values = Vec::with_capacity(columns.len());
                for i in 0..columns.len() {
                    values.push(from_sql(row.get_ref(i)?));
                }
                Ok(Row::new(table, values))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn count(&self, host: &HostId, table: Table) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE host = ?1", table.name());
        let count: i64 = self
            .conn
            .lock()
            .query_row(&sql, [host.as_str()], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(id: i64, show: i64, watched: i32) -> Row {
        Row::new(
            Table::Seasons,
            vec![
                id.into(),
                show.into(),
                1i32.into(),
                "Season 1".into(),
                10i32.into(),
                watched.into(),
                0i32.into(),
                SqlValue::Null,
                "".into(),
            ],
        )
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let host = HostId::from("den");
        store.insert(&host, &[season(1, 9, 3), season(2, 9, 4)]).unwrap();

        let rows = store.rows(&host, Table::Seasons).unwrap();
        assert_eq!(rows, vec![season(1, 9, 3), season(2, 9, 4)]);
        assert_eq!(store.count(&host, Table::Seasons).unwrap(), 2);
        assert_eq!(store.count(&HostId::from("attic"), Table::Seasons).unwrap(), 0);
    }

    #[test]
    fn test_delete_entity_and_kind() {
        let store = SqliteStore::open_in_memory().unwrap();
        let host = HostId::from("den");
        store
            .insert(&host, &[season(1, 9, 0), season(2, 9, 0), season(3, 10, 0)])
            .unwrap();

        store.delete_entity(&host, SyncKind::TvShows, 9).unwrap();
        assert_eq!(store.count(&host, Table::Seasons).unwrap(), 1);

        store.delete_kind(&host, SyncKind::TvShows).unwrap();
        assert_eq!(store.count(&host, Table::Seasons).unwrap(), 0);
    }

    #[test]
    fn test_update_by_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        let host = HostId::from("den");
        store.insert(&host, &[season(1, 9, 0), season(2, 9, 0)]).unwrap();

        store
            .update(&host, Table::Seasons, 2, &[("watched_episodes", 7i32.into())])
            .unwrap();

        let rows = store.rows(&host, Table::Seasons).unwrap();
        assert_eq!(rows[0].get("watched_episodes"), Some(&SqlValue::Integer(0)));
        assert_eq!(rows[1].get("watched_episodes"), Some(&SqlValue::Integer(7)));
    }

    #[test]
    fn test_rejects_malformed_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        let row = Row::new(Table::Genres, vec![1i64.into()]);
        assert!(matches!(
            store.insert(&HostId::from("den"), &[row]),
            Err(StoreError::RowShape { .. })
        ));
    }
}
