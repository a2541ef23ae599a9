//! `Orm`: the shared context statements are built from.

use std::fmt;
use std::sync::Arc;

use crate::accessor::{AccessorStrategy, FieldAccessor};
use crate::dialect::{Dialect, MySql};
use crate::entity::Entity;
use crate::error::OrmResult;
use crate::interceptor::{BoxFuture, Handler, Interceptor, Next, QueryContext, QueryOutput};
use crate::registry::Registry;
use crate::statement::{Insert, RawQuery, Select, Update};
use crate::value::Value;

/// Configuration for [`Orm`].
#[derive(Clone)]
pub struct OrmConfig {
    /// SQL dialect. Defaults to [`MySql`].
    pub dialect: Arc<dyn Dialect>,
    /// Field accessor strategy.
    pub accessor: AccessorStrategy,
    /// Metadata registry. `None` creates a private one.
    pub registry: Option<Arc<Registry>>,
    /// Interceptors, outermost first.
    pub interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Default for OrmConfig {
    fn default() -> Self {
        Self {
            dialect: Arc::new(MySql),
            accessor: AccessorStrategy::default(),
            registry: None,
            interceptors: Vec::new(),
        }
    }
}

impl OrmConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SQL dialect.
    pub fn dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Set the field accessor strategy.
    pub fn accessor(mut self, strategy: AccessorStrategy) -> Self {
        self.accessor = strategy;
        self
    }

    /// Share an existing registry.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Append an interceptor. The first one added is the outermost.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }
}

impl fmt::Debug for OrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrmConfig")
            .field("dialect", &self.dialect)
            .field("accessor", &self.accessor)
            .field("registry", &self.registry)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

/// Registry, dialect, accessor and interceptor chain shared by statements.
///
/// `Orm` holds no connection; statements are executed against any
/// [`Executor`](crate::Executor).
pub struct Orm {
    registry: Arc<Registry>,
    dialect: Arc<dyn Dialect>,
    accessor: Arc<dyn FieldAccessor>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Orm {
    /// MySQL dialect, default accessor, private registry, no interceptors.
    pub fn new() -> Self {
        Self::with_config(OrmConfig::default())
    }

    pub fn with_config(config: OrmConfig) -> Self {
        Self {
            registry: config.registry.unwrap_or_default(),
            dialect: config.dialect,
            accessor: config.accessor.accessor(),
            interceptors: config.interceptors,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn accessor(&self) -> &dyn FieldAccessor {
        self.accessor.as_ref()
    }

    pub fn select<T: Entity + Default>(&self) -> Select<'_, T> {
        Select::new(self)
    }

    pub fn insert<T: Entity>(&self) -> Insert<'_, T> {
        Insert::new(self)
    }

    pub fn update<T: Entity>(&self) -> Update<'_, T> {
        Update::new(self)
    }

    pub fn raw<T: Entity + Default>(&self, sql: impl Into<String>, args: Vec<Value>) -> RawQuery<'_, T> {
        RawQuery::new(self, sql, args)
    }

    /// Run `ctx` through the interceptors and then `terminal`.
    pub(crate) fn dispatch<'a>(
        &'a self,
        ctx: &'a QueryContext<'a>,
        terminal: &'a dyn Handler,
    ) -> BoxFuture<'a, OrmResult<QueryOutput>> {
        Next::new(&self.interceptors, terminal).run(ctx)
    }
}

impl Default for Orm {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orm")
            .field("dialect", &self.dialect.name())
            .field("accessor", &self.accessor)
            .field("registry", &self.registry)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
