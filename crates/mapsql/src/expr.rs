//! Expression algebra for projections, WHERE/HAVING conditions and
//! assignments.
//!
//! The tree only describes *what* to compute. Rendering it into SQL text and
//! arguments is done by [`SqlBuilder`](crate::SqlBuilder), which resolves
//! column names through entity metadata and rejects variants used in the
//! wrong place.
//!
//! ```ignore
//! use mapsql::{col, not};
//!
//! let p = col("age").ge(18).and(not(col("name").like("%bot")));
//! ```

use crate::value::Value;

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(Column),
    Value(Value),
    Predicate(Predicate),
    Assignment(Assignment),
    Aggregate(Aggregate),
    Raw(RawExpr),
}

impl Expr {
    /// Variant name, used in `UnsupportedExpression` messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Column(_) => "column",
            Expr::Value(_) => "value",
            Expr::Predicate(_) => "predicate",
            Expr::Assignment(_) => "assignment",
            Expr::Aggregate(_) => "aggregate",
            Expr::Raw(_) => "raw",
        }
    }
}

/// Operators of a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    And,
    Or,
    Not,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Or => 1,
            Op::And => 2,
            Op::Not => 3,
            Op::Eq | Op::Ne | Op::Lt | Op::Le | Op::Gt | Op::Ge | Op::Like => 4,
        }
    }
}

/// Conversion into an expression operand. Literals become [`Expr::Value`];
/// columns, aggregates, raw fragments and predicates are kept as they are.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Value(self)
    }
}

impl<T: Into<Value>> IntoExpr for Option<T> {
    fn into_expr(self) -> Expr {
        Expr::Value(self.into())
    }
}

macro_rules! impl_into_expr_literal {
    ($($ty:ty),* $(,)?) => {$(
        impl IntoExpr for $ty {
            fn into_expr(self) -> Expr {
                Expr::Value(Value::from(self))
            }
        }
    )*};
}

impl_into_expr_literal!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    Vec<u8>,
    serde_json::Value,
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDateTime,
    uuid::Uuid,
);

macro_rules! impl_node {
    ($($ty:ident),* $(,)?) => {$(
        impl IntoExpr for $ty {
            fn into_expr(self) -> Expr {
                Expr::$ty(self)
            }
        }

        impl From<$ty> for Expr {
            fn from(v: $ty) -> Self {
                Expr::$ty(v)
            }
        }
    )*};
}

impl_node!(Column, Predicate, Assignment, Aggregate);

impl IntoExpr for RawExpr {
    fn into_expr(self) -> Expr {
        Expr::Raw(self)
    }
}

impl From<RawExpr> for Expr {
    fn from(v: RawExpr) -> Self {
        Expr::Raw(v)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

macro_rules! comparison_ops {
    ($ty:ty) => {
        #[allow(clippy::should_implement_trait)]
        impl $ty {
            /// `self = rhs`
            pub fn eq(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Eq, rhs.into_expr())
            }

            /// `self != rhs`
            pub fn ne(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Ne, rhs.into_expr())
            }

            /// `self < rhs`
            pub fn lt(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Lt, rhs.into_expr())
            }

            /// `self <= rhs`
            pub fn le(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Le, rhs.into_expr())
            }

            /// `self > rhs`
            pub fn gt(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Gt, rhs.into_expr())
            }

            /// `self >= rhs`
            pub fn ge(self, rhs: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Ge, rhs.into_expr())
            }

            /// `self LIKE pattern`
            pub fn like(self, pattern: impl IntoExpr) -> Predicate {
                Predicate::binary(self.into(), Op::Like, pattern.into_expr())
            }
        }
    };
}

/// Reference to an entity field, by Rust field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
}

/// Column reference by field name.
pub fn col(name: impl Into<String>) -> Column {
    Column {
        name: name.into(),
        alias: None,
    }
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output alias, rendered only in a projection.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// `column = rhs` for UPDATE / upsert assignment lists.
    pub fn assign(self, rhs: impl IntoExpr) -> Assignment {
        Assignment {
            column: self.name,
            value: Box::new(rhs.into_expr()),
        }
    }

    pub fn asc(self) -> OrderBy {
        OrderBy {
            column: self.name,
            order: Order::Asc,
        }
    }

    pub fn desc(self) -> OrderBy {
        OrderBy {
            column: self.name,
            order: Order::Desc,
        }
    }
}

comparison_ops!(Column);

/// A boolean condition: a comparison or a logical combination.
///
/// `left` is empty only for `NOT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub(crate) left: Option<Box<Expr>>,
    pub(crate) op: Op,
    pub(crate) right: Box<Expr>,
}

impl Predicate {
    fn binary(left: Expr, op: Op, right: Expr) -> Self {
        Self {
            left: Some(Box::new(left)),
            op,
            right: Box::new(right),
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::binary(Expr::Predicate(self), Op::And, Expr::Predicate(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::binary(Expr::Predicate(self), Op::Or, Expr::Predicate(other))
    }

    /// Fold predicates left to right with `AND`. `None` when empty.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
        predicates.into_iter().reduce(Predicate::and)
    }
}

/// `NOT (p)`
pub fn not(p: Predicate) -> Predicate {
    Predicate {
        left: None,
        op: Op::Not,
        right: Box::new(Expr::Predicate(p)),
    }
}

/// `column = value` inside an UPDATE SET list or an upsert clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub(crate) column: String,
    pub(crate) value: Box<Expr>,
}

/// Assignment of `value` to the field named `column`.
pub fn assign(column: impl Into<String>, value: impl IntoExpr) -> Assignment {
    col(column).assign(value)
}

impl Assignment {
    pub fn column(&self) -> &str {
        &self.column
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFn {
    Avg,
    Sum,
    Count,
    Max,
    Min,
}

impl AggregateFn {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateFn::Avg => "AVG",
            AggregateFn::Sum => "SUM",
            AggregateFn::Count => "COUNT",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
        }
    }
}

/// `FUNC(column)` with an optional output alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub(crate) func: AggregateFn,
    pub(crate) arg: String,
    pub(crate) alias: Option<String>,
}

impl Aggregate {
    pub fn new(func: AggregateFn, column: impl Into<String>) -> Self {
        Self {
            func,
            arg: column.into(),
            alias: None,
        }
    }

    /// Output alias, rendered only in a projection.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

comparison_ops!(Aggregate);

pub fn avg(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Avg, column)
}

pub fn sum(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Sum, column)
}

pub fn count(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Count, column)
}

pub fn max(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Max, column)
}

pub fn min(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Min, column)
}

/// Verbatim SQL with its own arguments. Not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExpr {
    pub(crate) sql: String,
    pub(crate) args: Vec<Value>,
}

/// Raw SQL fragment; `args` bind to the `?`s inside `sql`, in order.
pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> RawExpr {
    RawExpr {
        sql: sql.into(),
        args,
    }
}

impl RawExpr {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub(crate) column: String,
    pub(crate) order: Order,
}

pub fn asc(column: impl Into<String>) -> OrderBy {
    col(column).asc()
}

pub fn desc(column: impl Into<String>) -> OrderBy {
    col(column).desc()
}

#[cfg(test)]
mod tests;
