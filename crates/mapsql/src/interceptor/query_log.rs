use std::fmt;
use std::sync::Arc;

use tracing::Level;

use super::{BoxFuture, Interceptor, Next, QueryContext, QueryOutput, StatementKind};
use crate::builder::Query;
use crate::error::OrmResult;

/// Custom destination for rendered statements.
pub type QueryLogSink = Arc<dyn Fn(StatementKind, &Query) + Send + Sync>;

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Interceptor that renders each statement and logs it before execution.
///
/// By default the statement is emitted as a `tracing` event with target
/// `mapsql::sql`. A render failure is returned without running the
/// statement.
#[derive(Clone)]
pub struct QueryLog {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    sink: Option<QueryLogSink>,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            sink: None,
        }
    }
}

impl QueryLog {
    /// Create a logger with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Send statements to `sink` instead of `tracing`. The sink receives the
    /// full statement; truncation only applies to tracing output.
    pub fn sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(StatementKind, &Query) + Send + Sync + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    fn emit(&self, kind: StatementKind, query: &Query) {
        if let Some(sink) = &self.sink {
            sink(kind, query);
            return;
        }

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let sql = match self.max_sql_length {
            Some(max) if query.sql().len() > max => {
                format!("{}...", truncate_sql_bytes(query.sql(), max))
            }
            _ => query.sql().to_string(),
        };
        emit_at_level!(
            self.level,
            target: "mapsql::sql",
            kind = %kind,
            arg_count = query.args().len(),
            sql = %sql,
            args = ?query.args(),
        );
    }
}

impl fmt::Debug for QueryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLog")
            .field("level", &self.level)
            .field("max_sql_length", &self.max_sql_length)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Interceptor for QueryLog {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            let query = ctx.build()?;
            self.emit(ctx.kind, &query);
            next.run(ctx).await
        })
    }
}
