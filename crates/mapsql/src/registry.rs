//! Entity metadata registry.
//!
//! Metadata is derived once per entity type from [`Entity::shape`] and then
//! shared as `Arc<EntityMeta>` by every statement touching that type. There
//! is no global cache: construct a [`Registry`] and pass it around (an
//! [`Orm`](crate::Orm) owns one by default).

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::entity::{Entity, EntityShape};
use crate::error::{OrmError, OrmResult};
use crate::value::FieldKind;

/// Name transform applied to type and field names.
pub type NameMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default naming: `_` before every uppercase letter except the first, then
/// lowercase. `UserName` becomes `user_name`.
pub fn underscore_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Column descriptor: one mapped field of an entity.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    /// Ordinal position in declaration order.
    pub index: usize,
    pub field_name: &'static str,
    pub column_name: String,
    pub kind: FieldKind,
    pub type_name: &'static str,
    /// Byte offset of the field inside the entity.
    pub offset: usize,
}

/// Table layout of one entity type. Immutable once registered.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    type_id: TypeId,
    type_name: &'static str,
    table_name: String,
    columns: Vec<ColumnMeta>,
    by_field: HashMap<&'static str, usize>,
    by_column: HashMap<String, usize>,
    by_column_folded: HashMap<String, usize>,
}

impl EntityMeta {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnMeta> {
        self.columns.get(index)
    }

    /// Look up a column by its Rust field name.
    pub fn field(&self, name: &str) -> Option<&ColumnMeta> {
        self.by_field.get(name).map(|&i| &self.columns[i])
    }

    /// Look up a column by result column name: exact match first, then ASCII
    /// case-insensitive.
    pub fn by_column(&self, column: &str) -> Option<&ColumnMeta> {
        self.by_column
            .get(column)
            .or_else(|| self.by_column_folded.get(&column.to_ascii_lowercase()))
            .map(|&i| &self.columns[i])
    }

    /// Field name lookup that fails with `UnknownField`.
    pub fn require_field(&self, name: &str) -> OrmResult<&ColumnMeta> {
        self.field(name)
            .ok_or_else(|| OrmError::UnknownField(name.to_string()))
    }
}

/// Thread-safe cache of [`EntityMeta`] keyed by entity type.
pub struct Registry {
    naming: NameMapper,
    models: RwLock<HashMap<TypeId, Arc<EntityMeta>>>,
}

impl Registry {
    /// Create a registry using [`underscore_name`].
    pub fn new() -> Self {
        Self::with_naming(underscore_name)
    }

    /// Create a registry with a custom naming transform.
    pub fn with_naming<F>(naming: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            naming: Arc::new(naming),
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Apply the naming transform to an arbitrary name.
    pub fn table_name(&self, name: &str) -> String {
        (self.naming)(name)
    }

    /// Cached metadata for `T`, deriving it on first use.
    pub fn get<T: Entity>(&self) -> OrmResult<Arc<EntityMeta>> {
        let cached = self
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned();
        match cached {
            Some(meta) => Ok(meta),
            None => self.register::<T>(),
        }
    }

    /// Derive metadata for `T` and store it, replacing any previous entry.
    ///
    /// Derivation is a pure function of the type, so racing registrations
    /// store equivalent metadata.
    pub fn register<T: Entity>(&self) -> OrmResult<Arc<EntityMeta>> {
        let meta = Arc::new(self.parse::<T>()?);
        tracing::debug!(
            target: "mapsql::registry",
            entity = meta.type_name,
            table = %meta.table_name,
            columns = meta.columns.len(),
            "registered entity metadata"
        );
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), Arc::clone(&meta));
        Ok(meta)
    }

    /// Number of cached entity types.
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse<T: Entity>(&self) -> OrmResult<EntityMeta> {
        let record = match T::shape() {
            EntityShape::Record(record) => record,
            other => return Err(OrmError::NotARecordType(other.type_name().to_string())),
        };

        let mut columns = Vec::with_capacity(record.fields.len());
        let mut by_field = HashMap::with_capacity(record.fields.len());
        let mut by_column = HashMap::with_capacity(record.fields.len());
        let mut by_column_folded = HashMap::with_capacity(record.fields.len());

        for (index, field) in record.fields.iter().enumerate() {
            let column_name = match field.column {
                Some(column) => column.to_string(),
                None => (self.naming)(field.name),
            };
            if by_column.contains_key(&column_name) {
                return Err(OrmError::DuplicateColumn {
                    entity: record.type_name,
                    column: column_name,
                });
            }
            by_field.insert(field.name, index);
            by_column.insert(column_name.clone(), index);
            by_column_folded
                .entry(column_name.to_ascii_lowercase())
                .or_insert(index);
            columns.push(ColumnMeta {
                index,
                field_name: field.name,
                column_name,
                kind: field.kind,
                type_name: field.type_name,
                offset: field.offset,
            });
        }

        let table_name = match record.table {
            Some(table) => table.to_string(),
            None => (self.naming)(record.type_name),
        };

        Ok(EntityMeta {
            type_id: TypeId::of::<T>(),
            type_name: record.type_name,
            table_name,
            columns,
            by_field,
            by_column,
            by_column_folded,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("models", &self.len())
            .finish_non_exhaustive()
    }
}
