//! Interceptor chain wrapped around statement execution.
//!
//! Every `get` / `get_multi` / `exec` call builds a [`QueryContext`] and
//! hands it to the first registered [`Interceptor`]. Each interceptor
//! decides whether to call [`Next::run`]; the end of the chain is the
//! terminal handler that renders the statement, runs it on the executor and
//! maps the result.
//!
//! The first registered interceptor is the outermost: it sees the request
//! first and the response last.
//!
//! # Example
//!
//! ```ignore
//! use mapsql::{BoxFuture, Interceptor, Next, OrmResult, QueryContext, QueryOutput};
//!
//! struct DenyUpdates;
//!
//! impl Interceptor for DenyUpdates {
//!     fn intercept<'a>(
//!         &'a self,
//!         ctx: &'a QueryContext<'a>,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
//!         Box::pin(async move {
//!             if ctx.kind == mapsql::StatementKind::Update {
//!                 return Err(mapsql::OrmError::aborted("updates are disabled"));
//!             }
//!             next.run(ctx).await
//!         })
//!     }
//! }
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::builder::Query;
use crate::error::{OrmError, OrmResult};
use crate::executor::WriteResult;

mod query_log;
pub use query_log::{QueryLog, QueryLogSink};

/// Boxed `Send` future returned by interceptors and handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which statement type a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Raw,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Raw => "raw",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that renders to a [`Query`].
pub trait QueryBuilder: Send + Sync {
    fn build(&self) -> OrmResult<Query>;
}

impl QueryBuilder for Query {
    fn build(&self) -> OrmResult<Query> {
        Ok(self.clone())
    }
}

/// Request passed down the chain.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub kind: StatementKind,
    pub builder: &'a dyn QueryBuilder,
}

impl<'a> QueryContext<'a> {
    pub fn new(kind: StatementKind, builder: &'a dyn QueryBuilder) -> Self {
        Self { kind, builder }
    }

    /// Render the carried statement.
    pub fn build(&self) -> OrmResult<Query> {
        self.builder.build()
    }
}

impl fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Result produced by the chain.
pub enum QueryOutput {
    /// Mapped entities: `T` for `get`, `Vec<T>` for `get_multi`.
    Rows(Box<dyn Any + Send>),
    Write(WriteResult),
}

impl QueryOutput {
    pub(crate) fn into_rows<T: Any>(self) -> OrmResult<T> {
        match self {
            QueryOutput::Rows(rows) => rows.downcast::<T>().map(|b| *b).map_err(|_| {
                OrmError::UnexpectedOutput(format!("rows are not a {}", type_name::<T>()))
            }),
            QueryOutput::Write(_) => Err(OrmError::UnexpectedOutput(
                "write result where rows were expected".into(),
            )),
        }
    }

    pub(crate) fn into_write(self) -> OrmResult<WriteResult> {
        match self {
            QueryOutput::Write(result) => Ok(result),
            QueryOutput::Rows(_) => Err(OrmError::UnexpectedOutput(
                "rows where a write result was expected".into(),
            )),
        }
    }
}

impl fmt::Debug for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutput::Rows(_) => f.write_str("Rows(..)"),
            QueryOutput::Write(result) => f.debug_tuple("Write").field(result).finish(),
        }
    }
}

/// End of the chain.
pub trait Handler: Send + Sync {
    fn handle<'a>(&'a self, ctx: &'a QueryContext<'a>) -> BoxFuture<'a, OrmResult<QueryOutput>>;
}

/// A link in the chain.
///
/// An interceptor may inspect or render the request, pass it on (possibly
/// replaced by another context) with `next.run(..)`, or return its own
/// result without calling `next`. Errors from `next` should be returned
/// unless the interceptor deliberately substitutes a result.
pub trait Interceptor: Send + Sync {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>>;
}

/// The rest of the chain after the current interceptor.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    terminal: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Interceptor>], terminal: &'a dyn Handler) -> Self {
        Self { chain, terminal }
    }

    /// Pass `ctx` to the next interceptor, or to the terminal handler.
    pub fn run<'b>(self, ctx: &'b QueryContext<'b>) -> BoxFuture<'b, OrmResult<QueryOutput>>
    where
        'a: 'b,
    {
        match self.chain.split_first() {
            Some((first, rest)) => first.intercept(ctx, Next::new(rest, self.terminal)),
            None => self.terminal.handle(ctx),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.chain.len())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "derive"))]
mod tests;
