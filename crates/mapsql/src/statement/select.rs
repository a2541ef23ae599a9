use std::marker::PhantomData;

use crate::builder::{Query, SqlBuilder};
use crate::entity::Entity;
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::expr::{Column, Expr, Order, OrderBy, Predicate};
use crate::interceptor::{QueryBuilder, QueryContext, StatementKind};
use crate::orm::Orm;

use super::{Fetch, FetchTerminal};

/// `SELECT` builder for entity `T`.
///
/// Clauses are emitted in the fixed order `SELECT … FROM … WHERE … GROUP BY
/// … HAVING … ORDER BY … LIMIT … OFFSET`; empty clauses are left out.
///
/// ```ignore
/// let user: User = orm
///     .select::<User>()
///     .where_(col("id").eq(1))
///     .get(&executor)
///     .await?;
/// ```
#[must_use]
pub struct Select<'a, T> {
    orm: &'a Orm,
    table: Option<String>,
    columns: Vec<Expr>,
    wheres: Vec<Predicate>,
    group_by: Vec<Column>,
    having: Vec<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: Entity + Default> Select<'a, T> {
    pub fn new(orm: &'a Orm) -> Self {
        Self {
            orm,
            table: None,
            columns: Vec::new(),
            wheres: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _entity: PhantomData,
        }
    }

    /// Read from `name` (after the naming transform) instead of the entity's
    /// table.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(self.orm.registry().table_name(name));
        self
    }

    /// Add projection items: columns, aggregates or raw fragments. Without
    /// any, the statement selects `*`.
    pub fn select<I, E>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a WHERE predicate. Repeated calls are joined with `AND`.
    pub fn where_(mut self, predicate: Predicate) -> Self {
        self.wheres.push(predicate);
        self
    }

    /// Add several WHERE predicates, joined with `AND`.
    pub fn where_all(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.wheres.extend(predicates);
        self
    }

    pub fn group_by(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.group_by.extend(columns);
        self
    }

    /// Add a HAVING predicate. Repeated calls are joined with `AND`.
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having.push(predicate);
        self
    }

    pub fn order_by(mut self, items: impl IntoIterator<Item = OrderBy>) -> Self {
        self.order_by.extend(items);
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Render the statement.
    pub fn build(&self) -> OrmResult<Query> {
        let meta = self.orm.registry().get::<T>()?;
        let mut b = SqlBuilder::new(&meta, self.orm.dialect());

        b.push("SELECT ");
        if self.columns.is_empty() {
            b.push_char('*');
        } else {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    b.push_char(',');
                }
                b.push_selectable(column)?;
            }
        }

        b.push(" FROM ");
        match &self.table {
            Some(table) => b.push_ident(table),
            None => b.push_ident(meta.table_name()),
        };

        b.push_conditions(" WHERE ", &self.wheres)?;

        if !self.group_by.is_empty() {
            b.push(" GROUP BY ");
            for (i, column) in self.group_by.iter().enumerate() {
                if i > 0 {
                    b.push_char(',');
                }
                b.push_column(column.name())?;
            }
        }

        b.push_conditions(" HAVING ", &self.having)?;

        if !self.order_by.is_empty() {
            b.push(" ORDER BY ");
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    b.push_char(',');
                }
                b.push_column(&item.column)?;
                b.push(match item.order {
                    Order::Asc => " ASC",
                    Order::Desc => " DESC",
                });
            }
        }

        if let Some(limit) = self.limit {
            b.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = self.offset {
            b.push(" OFFSET ").push_bind(offset);
        }

        Ok(b.finish())
    }

    /// Run the query and map the first row. Fails with `NoRows` when the
    /// result is empty.
    pub async fn get<E: Executor>(&self, exec: &E) -> OrmResult<T> {
        let terminal = FetchTerminal::<T, E>::new(self.orm, exec, Fetch::One);
        let ctx = QueryContext::new(StatementKind::Select, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_rows::<T>()
    }

    /// Run the query and map every row.
    pub async fn get_multi<E: Executor>(&self, exec: &E) -> OrmResult<Vec<T>> {
        let terminal = FetchTerminal::<T, E>::new(self.orm, exec, Fetch::All);
        let ctx = QueryContext::new(StatementKind::Select, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_rows::<Vec<T>>()
    }
}

impl<T: Entity + Default> QueryBuilder for Select<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        Select::build(self)
    }
}
