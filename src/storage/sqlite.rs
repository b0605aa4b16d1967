//! SQLite repository
//!
//! One table per record type, one column per declared field; the record
//! identity is the table's native `ROWID`. Every operation opens its own
//! connection and drops it before returning, so nothing is held between
//! calls.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::repository::{entity_name, Repository};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{FieldValue, Filter, Pk, Record, Schema};

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(FieldValue::Null),
            ValueRef::Integer(i) => Ok(FieldValue::Integer(i)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| FieldValue::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Real(r) if r.fract() == 0.0 => Ok(FieldValue::Integer(r as i64)),
            ValueRef::Real(_) | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Repository backed by a table in an SQLite database file
pub struct SqliteRepository<T: Record> {
    db_file: PathBuf,
    schema: &'static Schema,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteRepository<T> {
    /// Create a repository for `T` using its declared schema
    ///
    /// The table must already exist with matching columns; see
    /// [`initialize_schema`](super::init::initialize_schema).
    pub fn new(db_file: impl Into<PathBuf>) -> Self {
        Self::with_schema(db_file, T::schema())
    }

    /// Create a repository with an explicit table layout
    pub fn with_schema(db_file: impl Into<PathBuf>, schema: &'static Schema) -> Self {
        Self {
            db_file: db_file.into(),
            schema,
            _record: PhantomData,
        }
    }

    pub fn db_file(&self) -> &Path {
        &self.db_file
    }

    fn connect(&self) -> BookkeeperResult<Connection> {
        let conn = Connection::open(&self.db_file)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(conn)
    }

    fn columns(&self) -> String {
        self.schema.field_names().join(", ")
    }

    fn read_values(&self, row: &Row<'_>, offset: usize) -> rusqlite::Result<Vec<FieldValue>> {
        (0..self.schema.fields.len())
            .map(|i| row.get::<_, FieldValue>(i + offset))
            .collect()
    }

    /// Run `SELECT ROWID, <columns>` with an optional `WHERE` clause
    fn select(&self, condition: Option<(String, Vec<FieldValue>)>) -> BookkeeperResult<Vec<T>> {
        let mut sql = format!("SELECT ROWID, {} FROM {}", self.columns(), self.schema.table);
        let params = match condition {
            Some((clause, params)) => {
                sql.push_str(" WHERE ");
                sql.push_str(&clause);
                params
            }
            None => Vec::new(),
        };
        sql.push_str(" ORDER BY ROWID");
        tracing::debug!(%sql, "sqlite select");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                Ok((row.get::<_, Pk>(0)?, self.read_values(row, 1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(pk, values)| T::from_values(pk, values))
            .collect()
    }

    /// Build `col1 <op> AND col2 <op> ...` after checking every field is declared
    fn condition(
        &self,
        filter: &Filter,
        operator: fn(&str) -> String,
    ) -> BookkeeperResult<Option<(String, Vec<FieldValue>)>> {
        self.schema.check_filter(filter)?;
        if filter.is_empty() {
            return Ok(None);
        }

        let clause = filter
            .iter()
            .map(|(field, _)| operator(field))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = filter.iter().map(|(_, value)| value.clone()).collect();
        Ok(Some((clause, params)))
    }
}

impl<T: Record> Repository<T> for SqliteRepository<T> {
    fn add(&self, obj: &mut T) -> BookkeeperResult<Pk> {
        if obj.is_saved() {
            return Err(BookkeeperError::InvalidState(format!(
                "Cannot add {} that already has identity {}",
                entity_name::<T>(),
                obj.pk()
            )));
        }

        let placeholders = vec!["?"; self.schema.fields.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.schema.table,
            self.columns(),
            placeholders
        );
        tracing::debug!(%sql, "sqlite insert");

        let conn = self.connect()?;
        conn.execute(&sql, params_from_iter(obj.to_values()))?;
        let pk = conn.last_insert_rowid();
        obj.set_pk(pk);
        Ok(pk)
    }

    fn get(&self, pk: Pk) -> BookkeeperResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE ROWID = ?1",
            self.columns(),
            self.schema.table
        );
        tracing::debug!(%sql, pk, "sqlite get");

        let conn = self.connect()?;
        let values = conn
            .query_row(&sql, params![pk], |row| self.read_values(row, 0))
            .optional()?;

        values.map(|values| T::from_values(pk, values)).transpose()
    }

    fn get_all(&self, filter: Option<&Filter>) -> BookkeeperResult<Vec<T>> {
        let condition = match filter {
            Some(filter) => self.condition(filter, |field| format!("{} IS ?", field))?,
            None => None,
        };
        self.select(condition)
    }

    fn get_all_like(&self, filter: &Filter) -> BookkeeperResult<Vec<T>> {
        let condition = self.condition(filter, |field| format!("instr({}, ?) > 0", field))?;
        self.select(condition)
    }

    fn update(&self, obj: &T) -> BookkeeperResult<()> {
        let assignments = self
            .schema
            .field_names()
            .iter()
            .map(|name| format!("{} = ?", name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE ROWID = ?",
            self.schema.table, assignments
        );
        tracing::debug!(%sql, pk = obj.pk(), "sqlite update");

        let mut values = obj.to_values();
        values.push(FieldValue::Integer(obj.pk()));

        let conn = self.connect()?;
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(BookkeeperError::record_not_found(entity_name::<T>(), obj.pk()));
        }
        Ok(())
    }

    fn delete(&self, pk: Pk) -> BookkeeperResult<()> {
        let sql = format!("DELETE FROM {} WHERE ROWID = ?1", self.schema.table);
        tracing::debug!(%sql, pk, "sqlite delete");

        let conn = self.connect()?;
        let changed = conn.execute(&sql, params![pk])?;
        if changed == 0 {
            return Err(BookkeeperError::record_not_found(entity_name::<T>(), pk));
        }
        Ok(())
    }
}
