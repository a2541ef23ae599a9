use crate::builder::{Query, SqlBuilder};
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, WriteResult};
use crate::expr::{Assignment, Column, Predicate};
use crate::interceptor::{QueryBuilder, QueryContext, StatementKind};
use crate::orm::Orm;

use super::WriteTerminal;

/// One item of an UPDATE SET list.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignable {
    /// Set the column to the supplied entity's current field value.
    Column(Column),
    /// Set the column to an explicit expression.
    Assignment(Assignment),
}

impl Assignable {
    /// Field name being assigned.
    pub fn field(&self) -> &str {
        match self {
            Assignable::Column(c) => c.name(),
            Assignable::Assignment(a) => a.column(),
        }
    }
}

impl From<Column> for Assignable {
    fn from(c: Column) -> Self {
        Assignable::Column(c)
    }
}

impl From<Assignment> for Assignable {
    fn from(a: Assignment) -> Self {
        Assignable::Assignment(a)
    }
}

/// `UPDATE` builder for entity `T`.
///
/// When the same field is assigned more than once, the last occurrence wins
/// and keeps its own position in the SET list.
#[must_use]
pub struct Update<'a, T> {
    orm: &'a Orm,
    entity: Option<&'a T>,
    table: Option<String>,
    assigns: Vec<Assignable>,
    wheres: Vec<Predicate>,
}

impl<'a, T: Entity> Update<'a, T> {
    pub fn new(orm: &'a Orm) -> Self {
        Self {
            orm,
            entity: None,
            table: None,
            assigns: Vec::new(),
            wheres: Vec::new(),
        }
    }

    /// Entity that bare-column assignments read their values from.
    pub fn entity(mut self, entity: &'a T) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Update `name` (after the naming transform) instead of the entity's
    /// table.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(self.orm.registry().table_name(name));
        self
    }

    /// Add SET items: bare columns (value from the entity) or assignments.
    pub fn set<I, A>(mut self, assigns: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Assignable>,
    {
        self.assigns.extend(assigns.into_iter().map(Into::into));
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

    /// SET items with earlier duplicates of the same field removed.
    fn effective_assigns(&self) -> impl Iterator<Item = &Assignable> {
        self.assigns.iter().enumerate().filter_map(|(i, a)| {
            let overridden = self.assigns[i + 1..]
                .iter()
                .any(|later| later.field() == a.field());
            (!overridden).then_some(a)
        })
    }

    /// Render the statement.
    pub fn build(&self) -> OrmResult<Query> {
        if self.assigns.is_empty() {
            return Err(OrmError::NoUpdatedColumns);
        }

        let meta = self.orm.registry().get::<T>()?;
        let accessor = self.orm.accessor();
        let mut b = SqlBuilder::new(&meta, self.orm.dialect());

        b.push("UPDATE ");
        match &self.table {
            Some(table) => b.push_ident(table),
            None => b.push_ident(meta.table_name()),
        };
        b.push(" SET ");

        for (i, assign) in self.effective_assigns().enumerate() {
            if i > 0 {
                b.push_char(',');
            }
            match assign {
                Assignable::Assignment(a) => b.push_assignment(a)?,
                Assignable::Column(c) => {
                    let entity = self
                        .entity
                        .ok_or_else(|| OrmError::MissingEntity(c.name().to_string()))?;
                    let value = accessor.field_by_name(entity, &meta, c.name())?;
                    b.push_column(c.name())?;
                    b.push(" = ").push_bind(value);
                }
            }
        }

        b.push_conditions(" WHERE ", &self.wheres)?;
        Ok(b.finish())
    }

    /// Execute the update.
    pub async fn exec<E: Executor>(&self, exec: &E) -> OrmResult<WriteResult> {
        let terminal = WriteTerminal { exec };
        let ctx = QueryContext::new(StatementKind::Update, self);
        self.orm.dispatch(&ctx, &terminal).await?.into_write()
    }
}

impl<T: Entity> QueryBuilder for Update<'_, T> {
    fn build(&self) -> OrmResult<Query> {
        Update::build(self)
    }
}
