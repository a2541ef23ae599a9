//! Bindable values and the closed set of Rust field types an entity may use.
//!
//! [`Value`] is what travels in argument lists and row cursors. [`FieldType`]
//! connects a concrete Rust type to a [`FieldKind`], which is what the
//! registry records per column and what a [`Slot`] uses to tell a row decoder
//! which shape to produce.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// A literal bound to a `?` placeholder or decoded from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Timestamp(DateTime<Utc>),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
}

impl Value {
    /// Short name of the variant, used in decode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::Timestamp(_) => "timestamp",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Scalar shape of a field, one per supported Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    F32,
    F64,
    Text,
    Bytes,
    Json,
    Timestamp,
    DateTime,
    Uuid,
}

/// Field kind recorded in entity metadata: the scalar plus whether the field
/// is an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKind {
    pub scalar: ScalarKind,
    pub nullable: bool,
}

impl FieldKind {
    pub const fn required(scalar: ScalarKind) -> Self {
        Self {
            scalar,
            nullable: false,
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            scalar: self.scalar,
            nullable: true,
        }
    }

    /// Whether a decoded value can land in a field of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        use ScalarKind::*;
        match value {
            Value::Null => self.nullable,
            Value::Bool(_) => matches!(
                self.scalar,
                Bool | I8 | I16 | I32 | I64 | U8 | U16 | U32
            ),
            Value::Int(_) => matches!(
                self.scalar,
                Bool | I8 | I16 | I32 | I64 | U8 | U16 | U32 | F32 | F64
            ),
            Value::Float(_) => matches!(self.scalar, F32 | F64),
            Value::Text(_) => matches!(
                self.scalar,
                Text | Bytes | Json | Timestamp | DateTime | Uuid
            ),
            Value::Bytes(_) => matches!(self.scalar, Bytes | Uuid),
            Value::Json(_) => matches!(self.scalar, Json),
            Value::Timestamp(_) | Value::DateTime(_) => matches!(self.scalar, Timestamp | DateTime),
            Value::Uuid(_) => matches!(self.scalar, Uuid),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust type that can be stored in an entity field.
///
/// The set is closed: the offset accessor writes through raw pointers typed
/// by [`FieldType::KIND`], so every kind must correspond to exactly one Rust
/// type.
pub trait FieldType: sealed::Sealed + Sized + Send + Sync + 'static {
    const KIND: FieldKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, String>;
}

/// Non-`Option` field types. `Option<T>` is a field type for each of these.
pub trait ScalarField: FieldType {}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("cannot convert {} to {expected}", got.type_name())
}

macro_rules! impl_int_field {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}
        impl ScalarField for $ty {}

        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::required(ScalarKind::$scalar);

            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, String> {
                match value {
                    Value::Int(v) => <$ty>::try_from(v)
                        .map_err(|_| format!("{v} is out of range for {}", stringify!($ty))),
                    Value::Bool(b) => Ok(<$ty>::from(b)),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        }
    )*};
}

impl_int_field! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
}

macro_rules! impl_float_field {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}
        impl ScalarField for $ty {}

        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::required(ScalarKind::$scalar);

            fn to_value(&self) -> Value {
                Value::Float(f64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, String> {
                match value {
                    Value::Float(v) => Ok(v as $ty),
                    Value::Int(v) => Ok(v as $ty),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Float(f64::from(v))
            }
        }
    )*};
}

impl_float_field! {
    f32 => F32,
    f64 => F64,
}

impl sealed::Sealed for bool {}
impl ScalarField for bool {}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Bool);

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl sealed::Sealed for String {}
impl ScalarField for String {}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Text);

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl sealed::Sealed for Vec<u8> {}
impl ScalarField for Vec<u8> {}

impl FieldType for Vec<u8> {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Bytes);

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("Vec<u8>", &other)),
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl sealed::Sealed for serde_json::Value {}
impl ScalarField for serde_json::Value {}

impl FieldType for serde_json::Value {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Json);

    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Json(v) => Ok(v),
            Value::Text(s) => serde_json::from_str(&s).map_err(|e| e.to_string()),
            other => Err(mismatch("json", &other)),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl sealed::Sealed for DateTime<Utc> {}
impl ScalarField for DateTime<Utc> {}

impl FieldType for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Timestamp);

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Timestamp(t) => Ok(t),
            Value::DateTime(n) => Ok(n.and_utc()),
            Value::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| e.to_string()),
            other => Err(mismatch("DateTime<Utc>", &other)),
        }
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl sealed::Sealed for NaiveDateTime {}
impl ScalarField for NaiveDateTime {}

impl FieldType for NaiveDateTime {
    const KIND: FieldKind = FieldKind::required(ScalarKind::DateTime);

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::DateTime(n) => Ok(n),
            Value::Timestamp(t) => Ok(t.naive_utc()),
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|e| e.to_string()),
            other => Err(mismatch("NaiveDateTime", &other)),
        }
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl sealed::Sealed for Uuid {}
impl ScalarField for Uuid {}

impl FieldType for Uuid {
    const KIND: FieldKind = FieldKind::required(ScalarKind::Uuid);

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(s) => Uuid::parse_str(&s).map_err(|e| e.to_string()),
            Value::Bytes(b) => Uuid::from_slice(&b).map_err(|e| e.to_string()),
            other => Err(mismatch("Uuid", &other)),
        }
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: ScalarField> sealed::Sealed for Option<T> {}

impl<T: ScalarField> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND.optional();

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Typed landing slot for one result column.
///
/// A row decoder reads [`Slot::kind`] to decide what to produce and then
/// calls [`Slot::put`]; the accessor takes the value back out and stores it
/// into the entity field.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    kind: FieldKind,
    value: Option<Value>,
}

impl Slot {
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, value: None }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Store a decoded value, rejecting shapes the slot's kind cannot hold.
    pub fn put(&mut self, value: Value) -> Result<(), String> {
        if !self.kind.accepts(&value) {
            return Err(format!(
                "{} cannot be stored in a {:?} field",
                value.type_name(),
                self.kind
            ));
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    pub fn take(&mut self) -> Option<Value> {
        self.value.take()
    }
}

#[cfg(test)]
mod tests;
