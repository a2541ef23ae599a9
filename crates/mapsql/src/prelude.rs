//! Convenient imports for typical `mapsql` usage.
//!
//! ```ignore
//! use mapsql::prelude::*;
//! ```

pub use crate::{
    AccessorStrategy, Executor, Orm, OrmConfig, OrmError, OrmResult, QueryLog, Value, asc, assign,
    avg, col, count, desc, max, min, not, raw, sum,
};

pub use crate::Entity;
