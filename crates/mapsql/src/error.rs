//! Error types for mapsql

use thiserror::Error;

/// Result type alias for mapsql operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed error produced by an executor.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for statement building, row mapping and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// The type cannot be described as a record with named fields
    #[error("Not a record type: {0}")]
    NotARecordType(String),

    /// A referenced field is not mapped on the entity
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Two fields of one entity map to the same column
    #[error("Duplicate column `{column}` on {entity}")]
    DuplicateColumn {
        entity: &'static str,
        column: String,
    },

    /// A result column does not map to any field
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Expression variant is not valid where it was used
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// Insert built without any value
    #[error("Insert requires at least one row")]
    ZeroRowInsert,

    /// Update built without any assignment
    #[error("Update requires at least one column")]
    NoUpdatedColumns,

    /// An update reads field values but no entity was supplied
    #[error("Update reads `{0}` from the entity, but no entity was supplied")]
    MissingEntity(String),

    /// Select returned no rows
    #[error("No rows returned")]
    NoRows,

    /// The result has more columns than the entity maps
    #[error("Too many columns: result has {returned}, entity maps {mapped}")]
    TooManyColumns { returned: usize, mapped: usize },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Metadata does not describe the entity it was applied to
    #[error("Entity mismatch: metadata for {expected} applied to another type")]
    EntityMismatch { expected: &'static str },

    /// The handler chain produced a result of the wrong shape
    #[error("Unexpected output: {0}")]
    UnexpectedOutput(String),

    /// Feature not available from the dialect or driver
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// An interceptor stopped the statement
    #[error("Aborted: {0}")]
    Aborted(String),

    /// Executor failure, passed through unchanged
    #[error("Driver error: {0}")]
    Driver(#[source] DriverError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap an executor error
    pub fn driver(err: impl Into<DriverError>) -> Self {
        Self::Driver(err.into())
    }

    /// Create an error for an interceptor short-circuit
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }

    /// Create an unsupported-expression error
    pub fn unsupported_expression(message: impl Into<String>) -> Self {
        Self::UnsupportedExpression(message.into())
    }

    /// Check if this is a no rows error
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Check if this is a name resolution miss (`UnknownField` or `UnknownColumn`)
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::UnknownField(_) | Self::UnknownColumn(_))
    }

    /// Check if this error came from the executor
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        Self::Driver(Box::new(err))
    }
}
