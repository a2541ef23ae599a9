use crate::builder::{Query, SqlBuilder};
use crate::dialect::{Upsert, UpsertAssign};
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, WriteResult};
use crate::interceptor::{QueryBuilder, QueryContext, StatementKind};
use crate::orm::Orm;
use crate::registry::ColumnMeta;

use super::WriteTerminal;

/// `INSERT` builder for one or more `T` values.
///
/// Values are read through the field accessor in the same order as the
/// emitted column list.
#[must_use]
pub struct Insert<'a, T> {
    orm: &'a Orm,
    values: Vec<&'a T>,
    columns: Vec<String>,
    upsert: Option<Upsert>,
}

impl<'a, T: Entity> Insert<'a, T> {
    pub fn new(orm: &'a Orm) -> Self {
        Self {
            orm,
            values: Vec::new(),
            columns: Vec::new(),
            upsert: None,
        }
    }

    /// Add rows. Each value becomes one tuple after `VALUES`.
    pub fn values(mut self, values: impl IntoIterator<Item = &'a T>) -> Self {
        self.values.extend(values);
        self
    }

    /// Insert only these fields, in this order. Defaults to every mapped
    /// field in declaration order.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Start an upsert clause.
    pub fn on_duplicate_key(self) -> UpsertBuilder<'a, T> {
        UpsertBuilder {
            insert: self,
            conflict_columns: Vec::new(),
        }
    }

    /// Render the statement.
    pub fn build(&self) -> OrmResult<Query> {
        if self.values.is_empty() {
            return Err(OrmError::ZeroRowInsert);
        }

        let meta = self.orm.registry().get::<T>()?;
        let columns: Vec<&ColumnMeta> = if self.columns.is_empty() {
            meta.columns().iter().collect()
        } else {
            self.columns
                .iter()
                .map(|name| meta.require_field(name))
                .collect::<OrmResult<_>>()?
        };

        let accessor = self.orm.accessor();
        let mut b = SqlBuilder::new(&meta, self.orm.dialect());
        b.push("INSERT INTO ").push_ident(meta.table_name()).push_char('(');
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                b.push_char(',');
            }
            b.push_ident(&column.column_name);
        }
        b.push(") VALUES");

        for (row, value) in self.values.iter().enumerate() {
            if row > 0 {
                b.push_char(',');
            }
            b.push_char('(');
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    b.push_char(',');
                }
                b.push_bind(accessor.field(*value, &meta, column.index)?);
            }
            b.push_char(')');
        }

        if let Some(upsert) = &self.upsert {
            self.orm.dialect().build_upsert(&mut b, upsert)?;
        }

        Ok(b.finish())
    }

    /// Execute the insert.
    pub async fn exec<E: Executor>(&self, exec: &E) -> OrmResult<WriteResult> {
        let terminal = WriteTerminal { exec };
        let ctx = QueryContext::new(StatementKind::Insert, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_write()
    }
}

impl<T: Entity> QueryBuilder for Insert<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        Insert::build(self)
    }
}

/// Upsert clause under construction; finish with [`UpsertBuilder::update`].
#[must_use]
pub struct UpsertBuilder<'a, T> {
    insert: Insert<'a, T>,
    conflict_columns: Vec<String>,
}

impl<'a, T: Entity> UpsertBuilder<'a, T> {
    /// Conflict target fields (used by dialects that name one).
    pub fn conflict_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflict_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// What to update on conflict. A bare column takes the value the insert
    /// proposed for it; an assignment sets an explicit expression.
    pub fn update<I, A>(mut self, assigns: I) -> Insert<'a, T>
    where
        I: IntoIterator<Item = A>,
        A: Into<UpsertAssign>,
    {
        self.insert.upsert = Some(Upsert {
            conflict_columns: self.conflict_columns,
            assigns: assigns.into_iter().map(Into::into).collect(),
        });
        self.insert
    }
}
