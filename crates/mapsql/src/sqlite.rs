//! [`Executor`] for `sqlx::SqlitePool` (feature `sqlite`).
//!
//! Rows are fetched eagerly and decoded per column using the slot's
//! [`FieldKind`], so integers, reals, text and blobs land in the Rust type
//! the entity declares.

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool};

use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, RowCursor, WriteResult};
use crate::value::{FieldKind, ScalarKind, Slot, Value};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_value(query: SqliteQuery<'_>, value: Value) -> SqliteQuery<'_> {
    match value {
        Value::Null => query.bind(Option::<i64>::None),
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Bytes(b) => query.bind(b),
        Value::Json(v) => query.bind(v.to_string()),
        Value::Timestamp(t) => query.bind(t),
        Value::DateTime(t) => query.bind(t),
        Value::Uuid(u) => query.bind(u),
    }
}

fn prepare<'q>(sql: &'q str, args: &[Value]) -> SqliteQuery<'q> {
    args.iter()
        .cloned()
        .fold(sqlx::query(sql), bind_value)
}

fn decode_column(row: &SqliteRow, index: usize, kind: FieldKind) -> Result<Value, sqlx::Error> {
    fn opt<T>(v: Option<T>, f: impl FnOnce(T) -> Value) -> Value {
        v.map(f).unwrap_or(Value::Null)
    }

    Ok(match kind.scalar {
        ScalarKind::Bool => opt(row.try_get::<Option<bool>, _>(index)?, Value::Bool),
        ScalarKind::I8
        | ScalarKind::I16
        | ScalarKind::I32
        | ScalarKind::I64
        | ScalarKind::U8
        | ScalarKind::U16
        | ScalarKind::U32 => opt(row.try_get::<Option<i64>, _>(index)?, Value::Int),
        ScalarKind::F32 | ScalarKind::F64 => {
            opt(row.try_get::<Option<f64>, _>(index)?, Value::Float)
        }
        ScalarKind::Text | ScalarKind::Json => {
            opt(row.try_get::<Option<String>, _>(index)?, Value::Text)
        }
        ScalarKind::Bytes => opt(row.try_get::<Option<Vec<u8>>, _>(index)?, Value::Bytes),
        ScalarKind::Timestamp => opt(
            row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?,
            Value::Timestamp,
        ),
        ScalarKind::DateTime => opt(
            row.try_get::<Option<chrono::NaiveDateTime>, _>(index)?,
            Value::DateTime,
        ),
        ScalarKind::Uuid => opt(row.try_get::<Option<uuid::Uuid>, _>(index)?, Value::Uuid),
    })
}

/// Fetched SQLite rows.
pub struct SqliteRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<SqliteRow>,
    current: Option<SqliteRow>,
}

impl RowCursor for SqliteRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> bool {
        self.current = self.rows.next();
        self.current.is_some()
    }

    fn decode(&mut self, slots: &mut [Slot]) -> OrmResult<()> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::Other("decode called without a current row".into()))?;
        for (index, slot) in slots.iter_mut().enumerate() {
            let column = self.columns.get(index).map(String::as_str).unwrap_or("?");
            let value = decode_column(row, index, slot.kind())
                .map_err(|e| OrmError::decode(column, e.to_string()))?;
            slot.put(value)
                .map_err(|message| OrmError::decode(column, message))?;
        }
        Ok(())
    }
}

impl Executor for SqlitePool {
    type Rows = SqliteRows;

    async fn execute_write(&self, sql: &str, args: &[Value]) -> OrmResult<WriteResult> {
        let result = prepare(sql, args).execute(self).await?;
        Ok(WriteResult::new(
            Some(result.last_insert_rowid()),
            Some(result.rows_affected()),
        ))
    }

    async fn execute_query(&self, sql: &str, args: &[Value]) -> OrmResult<SqliteRows> {
        let rows = prepare(sql, args).fetch_all(self).await?;
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        Ok(SqliteRows {
            columns,
            rows: rows.into_iter(),
            current: None,
        })
    }
}

#[cfg(all(test, feature = "derive"))]
mod tests;
