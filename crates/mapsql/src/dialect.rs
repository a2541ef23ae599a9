//! SQL dialects: identifier quoting and upsert rendering.
//!
//! Placeholder style (`?`) and the clause keyword set are the same for every
//! dialect.

use std::fmt;

use crate::builder::SqlBuilder;
use crate::error::{OrmError, OrmResult};
use crate::expr::Assignment;

/// One assignment in an upsert clause.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertAssign {
    /// Explicit `column = expression`.
    Assign(Assignment),
    /// Take the value the insert proposed for this field.
    Proposed(String),
}

impl From<Assignment> for UpsertAssign {
    fn from(a: Assignment) -> Self {
        UpsertAssign::Assign(a)
    }
}

impl From<crate::expr::Column> for UpsertAssign {
    fn from(c: crate::expr::Column) -> Self {
        UpsertAssign::Proposed(c.name)
    }
}

/// Conflict handling attached to an insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upsert {
    /// Conflict target fields. Ignored by MySQL.
    pub conflict_columns: Vec<String>,
    pub assigns: Vec<UpsertAssign>,
}

/// Syntax variation points of a SQL dialect.
pub trait Dialect: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Identifier quote character.
    fn quote(&self) -> char;

    /// Append the upsert clause (with its leading space) to an INSERT.
    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()>;
}

fn push_upsert_assigns(
    b: &mut SqlBuilder<'_>,
    assigns: &[UpsertAssign],
    proposed: impl Fn(&mut SqlBuilder<'_>, &str) -> OrmResult<()>,
) -> OrmResult<()> {
    if assigns.is_empty() {
        return Err(OrmError::NoUpdatedColumns);
    }
    for (i, assign) in assigns.iter().enumerate() {
        if i > 0 {
            b.push_char(',');
        }
        match assign {
            UpsertAssign::Assign(a) => b.push_assignment(a)?,
            UpsertAssign::Proposed(field) => {
                b.push_column(field)?;
                b.push(" = ");
                proposed(b, field)?;
            }
        }
    }
    Ok(())
}

/// MySQL: backtick quoting, `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self) -> char {
        '`'
    }

    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()> {
        b.push(" ON DUPLICATE KEY UPDATE ");
        push_upsert_assigns(b, &upsert.assigns, |b, field| {
            b.push("VALUES(");
            b.push_column(field)?;
            b.push_char(')');
            Ok(())
        })
    }
}

/// SQLite: double-quote quoting, `ON CONFLICT ... DO UPDATE SET`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote(&self) -> char {
        '"'
    }

    fn build_upsert(&self, b: &mut SqlBuilder<'_>, upsert: &Upsert) -> OrmResult<()> {
        b.push(" ON CONFLICT");
        if !upsert.conflict_columns.is_empty() {
            b.push_char('(');
            for (i, field) in upsert.conflict_columns.iter().enumerate() {
                if i > 0 {
                    b.push_char(',');
                }
                b.push_column(field)?;
            }
            b.push_char(')');
        }
        b.push(" DO UPDATE SET ");
        push_upsert_assigns(b, &upsert.assigns, |b, field| {
            b.push("excluded.");
            b.push_column(field)?;
            Ok(())
        })
    }
}
