//! Query logging example for mapsql
//!
//! Run with: cargo run --example query_log -p mapsql
//!
//! This example demonstrates:
//! - `QueryLog` emitting rendered SQL through `tracing`
//! - `QueryLog` with a custom sink
//! - A custom interceptor that short-circuits execution
//! - An in-memory executor built on `BufferedRows`

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mapsql::{
    BoxFuture, BufferedRows, Entity, Executor, Interceptor, Next, Orm, OrmConfig, OrmError,
    OrmResult, QueryContext, QueryLog, QueryOutput, StatementKind, Value, WriteResult, col,
};
use tracing::Level;

#[derive(Debug, Default, Entity)]
#[allow(dead_code)]
struct Account {
    id: i64,
    owner: String,
    balance: f64,
}

/// Executor answering every query with two fixed accounts.
struct FixedRows;

impl Executor for FixedRows {
    type Rows = BufferedRows;

    async fn execute_write(&self, _sql: &str, _args: &[Value]) -> OrmResult<WriteResult> {
        Ok(WriteResult::new(Some(3), Some(1)))
    }

    async fn execute_query(&self, _sql: &str, _args: &[Value]) -> OrmResult<BufferedRows> {
        Ok(BufferedRows::new(
            ["id", "owner", "balance"],
            vec![
                vec![Value::Int(1), "ann".into(), Value::Float(10.0)],
                vec![Value::Int(2), "ben".into(), Value::Float(-4.5)],
            ],
        ))
    }
}

#[derive(Default)]
struct GuardStats {
    reads: AtomicU64,
    rejected: AtomicU64,
}

/// Counts reads and rejects writes.
struct ReadOnlyGuard {
    stats: Arc<GuardStats>,
}

impl Interceptor for ReadOnlyGuard {
    fn intercept<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        next: Next<'a>,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Box::pin(async move {
            match ctx.kind {
                StatementKind::Select | StatementKind::Raw => {
                    self.stats.reads.fetch_add(1, Ordering::Relaxed);
                    next.run(ctx).await
                }
                StatementKind::Insert | StatementKind::Update => {
                    self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                    Err(OrmError::aborted("read-only mode"))
                }
            }
        })
    }
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    println!("=== QueryLog via tracing ===");
    let orm = Orm::with_config(OrmConfig::new().interceptor(QueryLog::new().level(Level::INFO)));
    let accounts = orm
        .select::<Account>()
        .where_(col("balance").gt(0.0))
        .get_multi(&FixedRows)
        .await?;
    println!("fetched {} accounts", accounts.len());

    println!("\n=== QueryLog with a sink ===");
    let orm = Orm::with_config(OrmConfig::new().interceptor(QueryLog::new().sink(
        |kind, query| println!("[{kind}] {} -- {:?}", query.sql(), query.args()),
    )));
    let first = orm.select::<Account>().get(&FixedRows).await?;
    println!("first account: {first:?}");
    let res = orm
        .insert::<Account>()
        .values([&first])
        .exec(&FixedRows)
        .await?;
    println!("last insert id: {}", res.last_insert_id()?);

    println!("\n=== Read-only guard ===");
    let stats = Arc::new(GuardStats::default());
    let orm = Orm::with_config(
        OrmConfig::new()
            .interceptor(ReadOnlyGuard {
                stats: Arc::clone(&stats),
            })
            .interceptor(QueryLog::new()),
    );
    orm.select::<Account>().get_multi(&FixedRows).await?;
    match orm.insert::<Account>().values([&first]).exec(&FixedRows).await {
        Err(e) => println!("insert rejected: {e}"),
        Ok(_) => println!("insert unexpectedly allowed"),
    }
    println!(
        "reads = {}, rejected = {}",
        stats.reads.load(Ordering::Relaxed),
        stats.rejected.load(Ordering::Relaxed)
    );

    Ok(())
}
