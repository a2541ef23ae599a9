//! Entity description consumed by the registry and the field accessors.

use std::any::Any;

use crate::error::OrmResult;
use crate::value::{FieldKind, Value};

/// A caller-defined record type mapped to a table.
///
/// Use `#[derive(Entity)]` rather than implementing this by hand.
///
/// # Safety
///
/// For `EntityShape::Record`, every [`FieldDescriptor`] returned by
/// [`Entity::shape`] must describe a field of `Self` whose Rust type is
/// exactly the one implied by `kind`, located at `offset` bytes from the
/// start of `Self`. The offset accessor reads and writes through these
/// offsets without further checks. `get_field` / `set_field` indices must
/// follow the same descriptor order.
pub unsafe trait Entity: Any + Send + Sync {
    /// Static description of the type. Called once per registration.
    fn shape() -> EntityShape
    where
        Self: Sized;

    /// Read the field at `index` (descriptor order).
    fn get_field(&self, index: usize) -> Option<Value>;

    /// Overwrite the field at `index` (descriptor order).
    fn set_field(&mut self, index: usize, value: Value) -> OrmResult<()>;
}

/// What kind of type an [`Entity`] is. Only records can be mapped.
#[derive(Debug, Clone)]
pub enum EntityShape {
    Record(RecordShape),
    Tuple(&'static str),
    Unit(&'static str),
}

impl EntityShape {
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityShape::Record(r) => r.type_name,
            EntityShape::Tuple(name) | EntityShape::Unit(name) => name,
        }
    }
}

/// A struct with named fields.
#[derive(Debug, Clone)]
pub struct RecordShape {
    pub type_name: &'static str,
    /// Verbatim table name from `#[orm(table = "...")]`.
    pub table: Option<&'static str>,
    pub fields: Vec<FieldDescriptor>,
}

/// One mapped field, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Verbatim column name from `#[orm(column = "...")]`.
    pub column: Option<&'static str>,
    pub kind: FieldKind,
    /// Declared Rust type, for diagnostics.
    pub type_name: &'static str,
    pub offset: usize,
}
