//! Field accessors: read entity fields for writes, populate entities from rows.
//!
//! Two strategies implement [`FieldAccessor`]:
//!
//! - [`ReflectAccessor`] goes through the entity's generated
//!   `get_field` / `set_field`.
//! - `OffsetAccessor` (feature `offset-accessor`) reads and writes fields in
//!   place through the byte offsets recorded in [`EntityMeta`].
//!
//! Both produce identical entity state for identical rows. Which one a
//! [`Orm`](crate::Orm) uses is fixed when it is built, see
//! [`AccessorStrategy`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::RowCursor;
use crate::registry::{ColumnMeta, EntityMeta};
use crate::value::{Slot, Value};

mod reflect;
pub use reflect::ReflectAccessor;

#[cfg(feature = "offset-accessor")]
mod offset;
#[cfg(feature = "offset-accessor")]
pub use offset::OffsetAccessor;

/// Reads fields out of an entity and writes scanned rows into one.
///
/// The accessor borrows the entity and its metadata per call and never keeps
/// either.
pub trait FieldAccessor: fmt::Debug + Send + Sync {
    /// Read the field at `index` (declaration order).
    fn field(&self, entity: &dyn Entity, meta: &EntityMeta, index: usize) -> OrmResult<Value>;

    /// Read a field by its Rust field name.
    fn field_by_name(&self, entity: &dyn Entity, meta: &EntityMeta, name: &str) -> OrmResult<Value> {
        let column = meta.require_field(name)?;
        self.field(entity, meta, column.index)
    }

    /// Decode the cursor's current row into `entity`.
    ///
    /// Fails with `TooManyColumns` before decoding when the row is wider than
    /// the entity, and with `UnknownColumn` when a result column maps to no
    /// field.
    fn populate_from_row(
        &self,
        entity: &mut dyn Entity,
        meta: &EntityMeta,
        row: &mut dyn RowCursor,
    ) -> OrmResult<()>;
}

/// Accessor selection, fixed at [`Orm`](crate::Orm) construction.
///
/// Defaults to `Reflect`; the offset accessor is only used when asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessorStrategy {
    #[default]
    Reflect,
    #[cfg(feature = "offset-accessor")]
    Offset,
}

impl AccessorStrategy {
    pub fn accessor(self) -> Arc<dyn FieldAccessor> {
        match self {
            AccessorStrategy::Reflect => Arc::new(ReflectAccessor),
            #[cfg(feature = "offset-accessor")]
            AccessorStrategy::Offset => Arc::new(OffsetAccessor),
        }
    }
}

fn ensure_entity(entity: &dyn Entity, meta: &EntityMeta) -> OrmResult<()> {
    let any: &dyn Any = entity;
    if any.type_id() == meta.type_id() {
        Ok(())
    } else {
        Err(OrmError::EntityMismatch {
            expected: meta.type_name(),
        })
    }
}

/// Resolve result columns against `meta`, decode the current row into typed
/// slots and pair each decoded value with its target column.
fn scan_row<'m>(
    meta: &'m EntityMeta,
    row: &mut dyn RowCursor,
) -> OrmResult<Vec<(&'m ColumnMeta, Value)>> {
    let names = row.columns();
    if names.len() > meta.columns().len() {
        return Err(OrmError::TooManyColumns {
            returned: names.len(),
            mapped: meta.columns().len(),
        });
    }

    let targets = names
        .iter()
        .map(|name| {
            meta.by_column(name)
                .ok_or_else(|| OrmError::UnknownColumn(name.clone()))
        })
        .collect::<OrmResult<Vec<_>>>()?;

    let mut slots: Vec<Slot> = targets.iter().map(|c| Slot::new(c.kind)).collect();
    row.decode(&mut slots)?;

    targets
        .into_iter()
        .zip(slots.iter_mut())
        .map(|(column, slot)| match slot.take() {
            Some(value) => Ok((column, value)),
            None => Err(OrmError::decode(
                column.column_name.as_str(),
                "row decoder left the slot empty",
            )),
        })
        .collect()
}

#[cfg(all(test, feature = "derive"))]
mod tests;
