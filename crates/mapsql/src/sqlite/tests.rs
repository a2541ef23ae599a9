use sqlx::sqlite::SqlitePoolOptions;

use super::*;
use crate::Entity;
use crate::dialect::Sqlite as SqliteDialect;
use crate::expr::{assign, col};
use crate::orm::{Orm, OrmConfig};

#[derive(Debug, Clone, Default, PartialEq, Entity)]
struct Note {
    id: i64,
    title: String,
    score: Option<f64>,
    pinned: bool,
    body: Vec<u8>,
    meta: serde_json::Value,
}

async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");
    sqlx::query(
        "CREATE TABLE note (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            score REAL,
            pinned BOOLEAN NOT NULL,
            body BLOB NOT NULL,
            meta TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool
}

fn orm() -> Orm {
    Orm::with_config(OrmConfig::new().dialect(SqliteDialect))
}

fn note(id: i64, title: &str, score: Option<f64>) -> Note {
    Note {
        id,
        title: title.into(),
        score,
        pinned: id % 2 == 0,
        body: vec![id as u8; 3],
        meta: serde_json::json!({ "id": id }),
    }
}

#[tokio::test]
async fn insert_then_select_round_trips() {
    let pool = create_test_pool().await;
    let orm = orm();
    let notes = [note(1, "first", Some(1.5)), note(2, "second", None)];

    let res = orm.insert::<Note>().values(&notes).exec(&pool).await.unwrap();
    assert_eq!(res.rows_affected().unwrap(), 2);
    assert_eq!(res.last_insert_id().unwrap(), 2);

    let loaded = orm
        .select::<Note>()
        .order_by([col("id").asc()])
        .get_multi(&pool)
        .await
        .unwrap();
    assert_eq!(loaded, notes);

    let one = orm
        .select::<Note>()
        .where_(col("title").like("sec%"))
        .get(&pool)
        .await
        .unwrap();
    assert_eq!(one, notes[1]);
}

#[tokio::test]
async fn update_and_upsert() {
    let pool = create_test_pool().await;
    let orm = orm();
    let original = note(1, "draft", None);
    orm.insert::<Note>().values([&original]).exec(&pool).await.unwrap();

    let res = orm
        .update::<Note>()
        .set([assign("score", 9.0)])
        .where_(col("id").eq(1))
        .exec(&pool)
        .await
        .unwrap();
    assert_eq!(res.rows_affected().unwrap(), 1);

    let renamed = note(1, "final", None);
    orm.insert::<Note>()
        .values([&renamed])
        .on_duplicate_key()
        .conflict_columns(["id"])
        .update([col("title")])
        .exec(&pool)
        .await
        .unwrap();

    let loaded = orm.select::<Note>().get(&pool).await.unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.score, Some(9.0));
}

#[tokio::test]
async fn empty_result_and_projection() {
    let pool = create_test_pool().await;
    let orm = orm();

    let err = orm
        .select::<Note>()
        .where_(col("id").eq(99))
        .get(&pool)
        .await
        .unwrap_err();
    assert!(err.is_no_rows());

    orm.insert::<Note>()
        .values([&note(3, "x", None)])
        .exec(&pool)
        .await
        .unwrap();
    let partial = orm
        .select::<Note>()
        .select([col("title")])
        .get(&pool)
        .await
        .unwrap();
    assert_eq!(partial.title, "x");
    assert_eq!(partial.id, 0);
}

#[tokio::test]
async fn driver_errors_are_wrapped() {
    let pool = create_test_pool().await;
    let err = orm()
        .raw::<Note>("SELECT * FROM missing_table", vec![])
        .get_multi(&pool)
        .await
        .unwrap_err();
    assert!(err.is_driver());
}
