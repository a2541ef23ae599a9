//! `#[orm(...)]` attribute parsing.

use syn::{Attribute, LitStr, Result};

#[derive(Default)]
pub(crate) struct StructAttrs {
    pub table: Option<String>,
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub column: Option<String>,
    pub skip: bool,
}

pub(crate) fn struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                out.table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute on struct, expected `table`"))
            }
        })?;
    }
    Ok(out)
}

pub(crate) fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                out.column = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute on field, expected `column` or `skip`"))
            }
        })?;
    }
    Ok(out)
}
