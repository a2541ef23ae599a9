//! The executor boundary: where rendered statements leave this crate.
//!
//! mapsql never opens connections or manages transactions. Anything that can
//! run `?`-placeholder SQL implements [`Executor`]; a pool handle and a
//! transaction handle are interchangeable wherever an executor is accepted.

use std::future::Future;
use std::sync::Arc;

use crate::error::{OrmError, OrmResult};
use crate::value::{Slot, Value};

/// Outcome of an `INSERT` / `UPDATE`.
///
/// Either figure may be unavailable from a given driver; the accessors fail
/// with `Unsupported` in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteResult {
    last_insert_id: Option<i64>,
    rows_affected: Option<u64>,
}

impl WriteResult {
    pub fn new(last_insert_id: Option<i64>, rows_affected: Option<u64>) -> Self {
        Self {
            last_insert_id,
            rows_affected,
        }
    }

    pub fn last_insert_id(&self) -> OrmResult<i64> {
        self.last_insert_id
            .ok_or_else(|| OrmError::Unsupported("last insert id not reported by driver".into()))
    }

    pub fn rows_affected(&self) -> OrmResult<u64> {
        self.rows_affected
            .ok_or_else(|| OrmError::Unsupported("affected rows not reported by driver".into()))
    }
}

/// Forward-only cursor over a query result.
pub trait RowCursor {
    /// Result column names, in result order.
    fn columns(&self) -> &[String];

    /// Move to the next row. Returns `false` once the result is exhausted.
    fn advance(&mut self) -> bool;

    /// Decode the current row into `slots`, one slot per result column.
    fn decode(&mut self, slots: &mut [Slot]) -> OrmResult<()>;
}

/// Runs rendered SQL.
///
/// Cancellation is dropping the returned future.
pub trait Executor: Send + Sync {
    type Rows: RowCursor + Send;

    /// Run a statement that does not return rows.
    fn execute_write(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<WriteResult>> + Send;

    /// Run a query and return a cursor over its rows.
    fn execute_query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Self::Rows>> + Send;
}

impl<E: Executor> Executor for &E {
    type Rows = E::Rows;

    fn execute_write(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<WriteResult>> + Send {
        (**self).execute_write(sql, args)
    }

    fn execute_query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Self::Rows>> + Send {
        (**self).execute_query(sql, args)
    }
}

impl<E: Executor> Executor for Arc<E> {
    type Rows = E::Rows;

    fn execute_write(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<WriteResult>> + Send {
        (**self).execute_write(sql, args)
    }

    fn execute_query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Self::Rows>> + Send {
        (**self).execute_query(sql, args)
    }
}

/// In-memory [`RowCursor`] over already-fetched rows.
#[derive(Debug, Clone, Default)]
pub struct BufferedRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl BufferedRows {
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter(),
            current: None,
        }
    }

    /// A result with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl RowCursor for BufferedRows {
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
        if row.len() != slots.len() {
            return Err(OrmError::decode(
                "*",
                format!("row has {} values, {} slots requested", row.len(), slots.len()),
            ));
        }
        for (i, (slot, value)) in slots.iter_mut().zip(row).enumerate() {
            let column = self.columns.get(i).map(String::as_str).unwrap_or("?");
            slot.put(value.clone())
                .map_err(|message| OrmError::decode(column, message))?;
        }
        Ok(())
    }
}
