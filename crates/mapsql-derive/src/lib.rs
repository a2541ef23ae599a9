//! Derive macros for mapsql
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;

/// Derive the `Entity` description for a struct.
///
/// # Example
///
/// ```ignore
/// use mapsql::Entity;
///
/// #[derive(Debug, Default, Entity)]
/// struct User {
///     id: i64,
///     #[orm(column = "display_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `Entity::shape()` - type name, table override and one descriptor per
///   field (name, kind, declared type, byte offset) in declaration order
/// - `Entity::get_field` / `Entity::set_field` - positional field access
///
/// Tuple and unit structs derive a non-record shape, which the registry
/// rejects at runtime. Enums and unions are rejected here.
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Use this table name verbatim
/// - `#[orm(column = "name")]` - Use this column name verbatim
/// - `#[orm(skip)]` - Leave the field unmapped
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
