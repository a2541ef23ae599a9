use super::*;

#[test]
fn integer_fields_check_range() {
    assert_eq!(i8::from_value(Value::Int(12)), Ok(12));
    assert!(i8::from_value(Value::Int(300)).is_err());
    assert!(u32::from_value(Value::Int(-1)).is_err());
    assert_eq!(i64::from_value(Value::Bool(true)), Ok(1));
}

#[test]
fn null_only_lands_in_option() {
    assert!(String::from_value(Value::Null).is_err());
    assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
    assert_eq!(
        Option::<i32>::from_value(Value::Int(5)),
        Ok(Some(5_i32))
    );
    assert_eq!(<Option<i32> as FieldType>::KIND, FieldKind::required(ScalarKind::I32).optional());
}

#[test]
fn text_coerces_into_structured_types() {
    let id = Uuid::new_v4();
    assert_eq!(Uuid::from_value(Value::Text(id.to_string())), Ok(id));

    let json = serde_json::Value::from_value(Value::Text(r#"{"a":1}"#.into())).unwrap();
    assert_eq!(json["a"], 1);

    let ts = DateTime::<Utc>::from_value(Value::Text("2024-05-01T10:00:00Z".into())).unwrap();
    assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
}

#[test]
fn option_into_value() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
}

#[test]
fn slot_rejects_incompatible_values() {
    let mut slot = Slot::new(i64::KIND);
    assert!(slot.put(Value::Text("nope".into())).is_err());
    assert!(slot.put(Value::Null).is_err());
    assert!(!slot.is_filled());

    slot.put(Value::Int(7)).unwrap();
    assert_eq!(slot.take(), Some(Value::Int(7)));

    let mut nullable = Slot::new(<Option<String>>::KIND);
    nullable.put(Value::Null).unwrap();
    assert!(nullable.is_filled());
}
