use std::marker::PhantomData;

use crate::builder::Query;
use crate::entity::Entity;
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::interceptor::{QueryBuilder, QueryContext, StatementKind};
use crate::orm::Orm;
use crate::value::Value;

use super::{Fetch, FetchTerminal};

/// Caller-written SQL whose rows map onto `T`.
///
/// The SQL is passed through unchanged; result columns must match `T`'s
/// column names.
#[must_use]
pub struct RawQuery<'a, T> {
    orm: &'a Orm,
    sql: String,
    args: Vec<Value>,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: Entity + Default> RawQuery<'a, T> {
    pub fn new(orm: &'a Orm, sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            orm,
            sql: sql.into(),
            args,
            _entity: PhantomData,
        }
    }

    /// Append one more argument.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn build(&self) -> OrmResult<Query> {
        Ok(Query::new(self.sql.clone(), self.args.clone()))
    }

    /// Run the query and map the first row. Fails with `NoRows` when the
    /// result is empty.
    pub async fn get<E: Executor>(&self, exec: &E) -> OrmResult<T> {
        let terminal = FetchTerminal::<T, E>::new(self.orm, exec, Fetch::One);
        let ctx = QueryContext::new(StatementKind::Raw, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_rows::<T>()
    }

    /// Run the query and map every row.
    pub async fn get_multi<E: Executor>(&self, exec: &E) -> OrmResult<Vec<T>> {
        let terminal = FetchTerminal::<T, E>::new(self.orm, exec, Fetch::All);
        let ctx = QueryContext::new(StatementKind::Raw, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_rows::<Vec<T>>()
    }
}

impl<T: Entity + Default> QueryBuilder for RawQuery<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        RawQuery::build(self)
    }
}
