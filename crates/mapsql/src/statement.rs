//! Statement types: fluent builders for SELECT, INSERT, UPDATE and raw SQL.
//!
//! Each builder is single-use and owned by one request. Configuration
//! methods consume and return the builder; `build()` renders it and can be
//! called repeatedly with the same result. Execution methods take any
//! [`Executor`] and run through the [`Orm`]'s interceptor chain.

use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, RowCursor};
use crate::interceptor::{BoxFuture, Handler, QueryContext, QueryOutput};
use crate::orm::Orm;

mod insert;
mod raw;
mod select;
mod update;

pub use insert::{Insert, UpsertBuilder};
pub use raw::RawQuery;
pub use select::Select;
pub use update::{Assignable, Update};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fetch {
    One,
    All,
}

/// Terminal handler for reads: render, query, map rows into `T`.
struct FetchTerminal<'e, T, E> {
    orm: &'e Orm,
    exec: &'e E,
    fetch: Fetch,
    _entity: PhantomData<fn() -> T>,
}

impl<'e, T, E> FetchTerminal<'e, T, E> {
    fn new(orm: &'e Orm, exec: &'e E, fetch: Fetch) -> Self {
        Self {
            orm,
            exec,
            fetch,
            _entity: PhantomData,
        }
    }
}

impl<T, E> FetchTerminal<'_, T, E>
where
    T: Entity + Default,
    E: Executor,
{
    fn map_row(&self, rows: &mut dyn RowCursor) -> OrmResult<T> {
        let meta = self.orm.registry().get::<T>()?;
        let mut entity = T::default();
        self.orm
            .accessor()
            .populate_from_row(&mut entity, &meta, rows)?;
        Ok(entity)
    }
}

impl<T, E> Handler for FetchTerminal<'_, T, E>
where
    T: Entity + Default,
    E: Executor,
{
    fn handle<'a>(&'a self, ctx: &'a QueryContext<'a>) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            let query = ctx.build()?;
            let mut rows = self
                .exec
                .execute_query(query.sql(), query.args())
                .await?;
            match self.fetch {
                Fetch::One => {
                    if !rows.advance() {
                        return Err(OrmError::NoRows);
                    }
                    let entity = self.map_row(&mut rows)?;
                    Ok(QueryOutput::Rows(Box::new(entity)))
                }
                Fetch::All => {
                    let mut out: Vec<T> = Vec::new();
                    while rows.advance() {
                        out.push(self.map_row(&mut rows)?);
                    }
                    Ok(QueryOutput::Rows(Box::new(out)))
                }
            }
        })
    }
}

/// Terminal handler for writes: render and execute.
struct WriteTerminal<'e, E> {
    exec: &'e E,
}

impl<E: Executor> Handler for WriteTerminal<'_, E> {
    fn handle<'a>(&'a self, ctx: &'a QueryContext<'a>) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            let query = ctx.build()?;
            let result = self.exec.execute_write(query.sql(), query.args()).await?;
            Ok(QueryOutput::Write(result))
        })
    }
}
