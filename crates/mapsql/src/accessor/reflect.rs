use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::RowCursor;
use crate::registry::EntityMeta;
use crate::value::Value;

use super::{FieldAccessor, ensure_entity, scan_row};

/// Safe accessor dispatching through `Entity::get_field` / `Entity::set_field`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectAccessor;

impl FieldAccessor for ReflectAccessor {
    fn field(&self, entity: &dyn Entity, meta: &EntityMeta, index: usize) -> OrmResult<Value> {
        ensure_entity(entity, meta)?;
        entity
            .get_field(index)
            .ok_or_else(|| OrmError::UnknownField(format!("{}#{index}", meta.type_name())))
    }

    fn populate_from_row(
        &self,
        entity: &mut dyn Entity,
        meta: &EntityMeta,
        row: &mut dyn RowCursor,
    ) -> OrmResult<()> {
        ensure_entity(entity, meta)?;
        for (column, value) in scan_row(meta, row)? {
            entity
                .set_field(column.index, value)
                .map_err(|err| match err {
                    OrmError::Decode { message, .. } => {
                        OrmError::decode(column.column_name.as_str(), message)
                    }
                    other => other,
                })?;
        }
        Ok(())
    }
}
