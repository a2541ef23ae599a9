//! SQL serialization engine.
//!
//! [`SqlBuilder`] appends SQL text and the matching argument list side by
//! side: every `?` it writes is paired with exactly one pushed argument, in
//! emission order. Column names are resolved through [`EntityMeta`] and
//! quoted with the dialect's quote character.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::expr::{Aggregate, Assignment, Expr, Op, Predicate, RawExpr};
use crate::registry::EntityMeta;
use crate::value::Value;

/// Rendered statement: SQL text plus positional arguments.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    args: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Whether a predicate operand needs parentheses under `parent`.
fn needs_parens(parent: Op, child: Op, side: Side) -> bool {
    match parent {
        Op::And | Op::Or => {
            child.precedence() < parent.precedence()
                || (side == Side::Right && child.precedence() == parent.precedence())
        }
        _ => true,
    }
}

/// Incremental SQL writer for one statement.
pub struct SqlBuilder<'a> {
    meta: &'a EntityMeta,
    quote: char,
    sql: String,
    args: Vec<Value>,
}

impl<'a> SqlBuilder<'a> {
    pub fn new(meta: &'a EntityMeta, dialect: &dyn Dialect) -> Self {
        Self {
            meta,
            quote: dialect.quote(),
            sql: String::with_capacity(128),
            args: Vec::new(),
        }
    }

    pub fn meta(&self) -> &'a EntityMeta {
        self.meta
    }

    /// Append raw SQL.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.sql.push(c);
        self
    }

    /// Append a quoted identifier. Embedded quote characters are doubled.
    pub fn push_ident(&mut self, name: &str) -> &mut Self {
        let q = self.quote;
        self.sql.push(q);
        for c in name.chars() {
            if c == q {
                self.sql.push(q);
            }
            self.sql.push(c);
        }
        self.sql.push(q);
        self
    }

    /// Append the quoted column for a field name.
    pub fn push_column(&mut self, field: &str) -> OrmResult<&mut Self> {
        let meta = self.meta;
        let column = meta.require_field(field)?;
        Ok(self.push_ident(&column.column_name))
    }

    /// Append a placeholder and bind `value` to it.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push('?');
        self.args.push(value.into());
        self
    }

    /// Append a raw fragment followed by its arguments.
    pub fn push_raw(&mut self, raw: &RawExpr) -> &mut Self {
        self.sql.push_str(&raw.sql);
        self.args.extend(raw.args.iter().cloned());
        self
    }

    fn push_aggregate(&mut self, agg: &Aggregate, with_alias: bool) -> OrmResult<()> {
        self.push(agg.func.as_str()).push_char('(');
        self.push_column(&agg.arg)?;
        self.push_char(')');
        if let (true, Some(alias)) = (with_alias, &agg.alias) {
            self.push(" AS ").push_ident(alias);
        }
        Ok(())
    }

    /// Render an expression used as an operand (condition side, assignment
    /// right-hand side). Aliases are not rendered here.
    pub fn push_expr(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Column(c) => {
                self.push_column(&c.name)?;
            }
            Expr::Value(v) => {
                self.push_bind(v.clone());
            }
            Expr::Predicate(p) => self.push_predicate(p)?,
            Expr::Aggregate(a) => self.push_aggregate(a, false)?,
            Expr::Raw(r) => {
                self.push_raw(r);
            }
            Expr::Assignment(a) => {
                return Err(OrmError::unsupported_expression(format!(
                    "assignment to `{}` used as an operand",
                    a.column
                )));
            }
        }
        Ok(())
    }

    fn push_operand(&mut self, expr: &Expr, parent: Op, side: Side) -> OrmResult<()> {
        match expr {
            Expr::Predicate(child) if needs_parens(parent, child.op, side) => {
                self.push_char('(');
                self.push_predicate(child)?;
                self.push_char(')');
                Ok(())
            }
            _ => self.push_expr(expr),
        }
    }

    /// Render `left OP right`, or `NOT (right)`.
    pub fn push_predicate(&mut self, p: &Predicate) -> OrmResult<()> {
        if let Some(left) = &p.left {
            self.push_operand(left, p.op, Side::Left)?;
            self.push_char(' ');
        }
        self.push(p.op.as_str()).push_char(' ');
        self.push_operand(&p.right, p.op, Side::Right)
    }

    /// Render one projection item: column, aggregate or raw fragment, with
    /// alias.
    pub fn push_selectable(&mut self, expr: &Expr) -> OrmResult<()> {
        match expr {
            Expr::Column(c) => {
                self.push_column(&c.name)?;
                if let Some(alias) = &c.alias {
                    self.push(" AS ").push_ident(alias);
                }
                Ok(())
            }
            Expr::Aggregate(a) => self.push_aggregate(a, true),
            Expr::Raw(r) => {
                self.push_raw(r);
                Ok(())
            }
            other => Err(OrmError::unsupported_expression(format!(
                "{} cannot be selected",
                other.kind()
            ))),
        }
    }

    /// Render `` `column` = rhs ``.
    pub fn push_assignment(&mut self, a: &Assignment) -> OrmResult<()> {
        self.push_column(&a.column)?;
        self.push(" = ");
        self.push_expr(&a.value)
    }

    /// Append `keyword` and the AND-fold of `predicates`; nothing when empty.
    pub fn push_conditions(&mut self, keyword: &str, predicates: &[Predicate]) -> OrmResult<()> {
        if let Some(root) = Predicate::all(predicates.iter().cloned()) {
            self.push(keyword);
            self.push_predicate(&root)?;
        }
        Ok(())
    }

    /// Terminate the statement.
    pub fn finish(mut self) -> Query {
        self.sql.push(';');
        Query {
            sql: self.sql,
            args: self.args,
        }
    }
}
