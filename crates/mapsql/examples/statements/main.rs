//! Statement rendering example for mapsql
//!
//! Run with: cargo run --example statements -p mapsql
//!
//! Builds SELECT, INSERT, UPDATE and upsert statements for both dialects and
//! prints the SQL with its arguments. No database is needed.

use mapsql::{
    Assignable, Entity, MySql, Orm, OrmConfig, OrmResult, Query, Sqlite, assign, avg, col, count, desc, not,
    raw,
};

#[derive(Debug, Default, Entity)]
#[orm(table = "users")]
struct User {
    id: i64,
    user_name: String,
    age: i32,
    email: Option<String>,
}

fn show(label: &str, query: &Query) {
    println!("{label}:");
    println!("  {}", query.sql());
    println!("  args = {:?}", query.args());
}

fn main() -> OrmResult<()> {
    let alice = User {
        id: 1,
        user_name: "alice".into(),
        age: 30,
        email: Some("alice@example.com".into()),
    };
    let bob = User {
        id: 2,
        user_name: "bob".into(),
        age: 25,
        email: None,
    };

    for orm in [
        Orm::with_config(OrmConfig::new().dialect(MySql)),
        Orm::with_config(OrmConfig::new().dialect(Sqlite)),
    ] {
        println!("=== {} ===", orm.dialect().name());

        let q = orm
            .select::<User>()
            .select([col("id"), col("user_name").alias("name")])
            .where_(col("age").ge(18).and(not(col("email").eq(None::<String>))))
            .order_by([desc("age")])
            .limit(10)
            .build()?;
        show("select", &q);

        let q = orm
            .select::<User>()
            .select([avg("age").alias("avg_age"), count("id").alias("n")])
            .group_by([col("email")])
            .having(count("id").gt(1))
            .build()?;
        show("aggregate", &q);

        let q = orm.insert::<User>().values([&alice, &bob]).build()?;
        show("insert", &q);

        let q = orm
            .insert::<User>()
            .values([&alice])
            .on_duplicate_key()
            .conflict_columns(["id"])
            .update([col("user_name"), col("email")])
            .build()?;
        show("upsert", &q);

        let q = orm
            .update::<User>()
            .entity(&alice)
            .set([
                Assignable::from(col("email")),
                assign("age", raw("`age` + ?", vec![1.into()])).into(),
            ])
            .where_(col("id").eq(alice.id))
            .build()?;
        show("update", &q);
        println!();
    }

    Ok(())
}
