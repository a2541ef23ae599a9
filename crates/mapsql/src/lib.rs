//! # mapsql
//!
//! Typed SQL statement construction and row mapping.
//!
//! ## Features
//!
//! - **Expression algebra**: columns, literals, predicates, aggregates, raw
//!   fragments and assignments as a closed enum ([`Expr`])
//! - **Placeholder safety**: every `?` is rendered together with its argument,
//!   in order
//! - **Entity metadata**: derived once per type via `#[derive(Entity)]` and
//!   cached in an explicit [`Registry`]
//! - **Two field accessors**: a safe one and an offset-based one
//!   (feature `offset-accessor`), interchangeable via [`AccessorStrategy`]
//! - **Dialects**: identifier quoting and upsert rendering ([`MySql`],
//!   [`Sqlite`])
//! - **Interceptors**: a middleware chain around every execution, with a
//!   `tracing`-based [`QueryLog`]
//! - **Executor-agnostic**: statements run on anything implementing
//!   [`Executor`]; `sqlx::SqlitePool` is supported with feature `sqlite`
//!
//! ## Example
//!
//! ```ignore
//! use mapsql::prelude::*;
//!
//! #[derive(Debug, Default, Entity)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let orm = Orm::new();
//!
//! // SELECT `id`,`name` FROM `user` WHERE `id` > ? AND `name` LIKE ? LIMIT ?;
//! let users = orm
//!     .select::<User>()
//!     .select([col("id"), col("name")])
//!     .where_(col("id").gt(10).and(col("name").like("a%")))
//!     .limit(20)
//!     .get_multi(&pool)
//!     .await?;
//!
//! // INSERT INTO `user`(`id`,`name`) VALUES(?,?),(?,?);
//! orm.insert::<User>().values(&users[..2]).exec(&pool).await?;
//! ```

extern crate self as mapsql;

pub mod accessor;
pub mod builder;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod executor;
pub mod expr;
pub mod interceptor;
pub mod orm;
pub mod prelude;
pub mod registry;
pub mod statement;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(all(test, feature = "derive"))]
mod testing;

pub use accessor::{AccessorStrategy, FieldAccessor, ReflectAccessor};
pub use builder::{Query, SqlBuilder};
pub use dialect::{Dialect, MySql, Sqlite, Upsert, UpsertAssign};
pub use entity::{Entity, EntityShape, FieldDescriptor, RecordShape};
pub use error::{DriverError, OrmError, OrmResult};
pub use executor::{BufferedRows, Executor, RowCursor, WriteResult};
pub use expr::{
    Aggregate, AggregateFn, Assignment, Column, Expr, IntoExpr, Op, Order, OrderBy, Predicate,
    RawExpr, asc, assign, avg, col, count, desc, max, min, not, raw, sum,
};
pub use interceptor::{
    BoxFuture, Handler, Interceptor, Next, QueryBuilder, QueryContext, QueryLog, QueryLogSink,
    QueryOutput, StatementKind,
};
pub use orm::{Orm, OrmConfig};
pub use registry::{ColumnMeta, EntityMeta, NameMapper, Registry, underscore_name};
pub use statement::{Assignable, Insert, RawQuery, Select, Update, UpsertBuilder};
pub use value::{FieldKind, FieldType, ScalarField, ScalarKind, Slot, Value};

#[cfg(feature = "offset-accessor")]
pub use accessor::OffsetAccessor;

#[cfg(feature = "derive")]
pub use mapsql_derive::Entity;
