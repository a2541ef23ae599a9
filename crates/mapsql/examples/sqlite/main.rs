//! SQLite example for mapsql
//!
//! Run with: cargo run --example sqlite -p mapsql --features sqlite
//!
//! Uses an in-memory database; set DATABASE_URL to use a file instead.

use std::env;

use mapsql::{Entity, Orm, OrmConfig, OrmResult, QueryLog, Sqlite, assign, col};
use sqlx::sqlite::SqlitePoolOptions;

#[derive(Debug, Default, Entity)]
#[orm(table = "tasks")]
struct Task {
    id: i64,
    title: String,
    done: bool,
    #[orm(column = "due")]
    due_at: Option<chrono::NaiveDateTime>,
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    tracing_subscriber::fmt::init();

    let url = env::var("DATABASE_URL").unwrap_or_else(|_| ":memory:".to_string());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            done BOOLEAN NOT NULL,
            due DATETIME
        )",
    )
    .execute(&pool)
    .await?;

    let orm = Orm::with_config(OrmConfig::new().dialect(Sqlite).interceptor(QueryLog::new()));

    let tasks = [
        Task {
            id: 1,
            title: "write docs".into(),
            done: false,
            due_at: chrono::NaiveDate::from_ymd_opt(2026, 1, 31)
                .and_then(|d| d.and_hms_opt(17, 0, 0)),
        },
        Task {
            id: 2,
            title: "ship".into(),
            done: false,
            due_at: None,
        },
    ];
    let res = orm
        .insert::<Task>()
        .values(&tasks)
        .on_duplicate_key()
        .conflict_columns(["id"])
        .update([col("title"), col("due_at")])
        .exec(&pool)
        .await?;
    println!("inserted {} rows", res.rows_affected()?);

    orm.update::<Task>()
        .set([assign("done", true)])
        .where_(col("id").eq(1))
        .exec(&pool)
        .await?;

    let open = orm
        .select::<Task>()
        .where_(col("done").eq(false))
        .order_by([col("id").asc()])
        .get_multi(&pool)
        .await?;
    for task in &open {
        println!("open: {task:?}");
    }

    Ok(())
}
