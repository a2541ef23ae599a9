//! In-place field access through precomputed byte offsets.
//!
//! Soundness rests on two checks: the `Entity` safety contract (descriptor
//! offsets and kinds match the type) and [`ensure_entity`], which rejects
//! metadata derived for a different type before any pointer is formed.

use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::executor::RowCursor;
use crate::registry::EntityMeta;
use crate::value::{FieldKind, FieldType, ScalarKind, Value};

use super::{FieldAccessor, ensure_entity, scan_row};

type ReadFn = unsafe fn(*const u8) -> Value;
type WriteFn = unsafe fn(*mut u8, Value) -> Result<(), String>;

/// # Safety
/// `ptr` must point to an initialized `T`.
unsafe fn read_as<T: FieldType>(ptr: *const u8) -> Value {
    unsafe { (*ptr.cast::<T>()).to_value() }
}

/// # Safety
/// `ptr` must point to an initialized `T` that is not otherwise borrowed.
unsafe fn write_as<T: FieldType>(ptr: *mut u8, value: Value) -> Result<(), String> {
    let value = T::from_value(value)?;
    unsafe {
        *ptr.cast::<T>() = value;
    }
    Ok(())
}

macro_rules! dispatch_kind {
    ($kind:expr, $f:ident) => {
        dispatch_kind!(@arms $kind, $f;
            Bool => bool,
            I8 => i8,
            I16 => i16,
            I32 => i32,
            I64 => i64,
            U8 => u8,
            U16 => u16,
            U32 => u32,
            F32 => f32,
            F64 => f64,
            Text => String,
            Bytes => Vec<u8>,
            Json => serde_json::Value,
            Timestamp => chrono::DateTime<chrono::Utc>,
            DateTime => chrono::NaiveDateTime,
            Uuid => uuid::Uuid,
        )
    };
    (@arms $kind:expr, $f:ident; $($scalar:ident => $ty:ty),* $(,)?) => {
        match ($kind.scalar, $kind.nullable) {
            $(
                (ScalarKind::$scalar, false) => $f::<$ty>,
                (ScalarKind::$scalar, true) => $f::<Option<$ty>>,
            )*
        }
    };
}

fn reader(kind: FieldKind) -> ReadFn {
    dispatch_kind!(kind, read_as)
}

fn writer(kind: FieldKind) -> WriteFn {
    dispatch_kind!(kind, write_as)
}

/// Accessor that reads and writes fields through their byte offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetAccessor;

impl FieldAccessor for OffsetAccessor {
    fn field(&self, entity: &dyn Entity, meta: &EntityMeta, index: usize) -> OrmResult<Value> {
        ensure_entity(entity, meta)?;
        let column = meta
            .column(index)
            .ok_or_else(|| OrmError::UnknownField(format!("{}#{index}", meta.type_name())))?;
        let base = (entity as *const dyn Entity).cast::<u8>();
        // SAFETY: `meta` belongs to the entity's concrete type (checked above),
        // so `offset` and `kind` describe an initialized field inside it.
        Ok(unsafe { reader(column.kind)(base.add(column.offset)) })
    }

    fn populate_from_row(
        &self,
        entity: &mut dyn Entity,
        meta: &EntityMeta,
        row: &mut dyn RowCursor,
    ) -> OrmResult<()> {
        ensure_entity(entity, meta)?;
        let decoded = scan_row(meta, row)?;
        let base = (entity as *mut dyn Entity).cast::<u8>();
        for (column, value) in decoded {
            // SAFETY: as in `field`; the exclusive borrow of `entity` covers
            // every write.
            unsafe { writer(column.kind)(base.add(column.offset), value) }
                .map_err(|message| OrmError::decode(column.column_name.as_str(), message))?;
        }
        Ok(())
    }
}
