use super::*;
use crate::Entity;
use crate::executor::BufferedRows;
use crate::orm::OrmConfig;
use crate::registry::Registry;
use crate::testing::{AllKinds, AuditEntry, User};

#[derive(Debug, Default, PartialEq, Entity)]
struct Reading {
    #[orm(column = "Level")]
    level: i8,
}

fn strategies() -> Vec<AccessorStrategy> {
    let mut out = vec![AccessorStrategy::Reflect];
    #[cfg(feature = "offset-accessor")]
    out.push(AccessorStrategy::Offset);
    out
}

fn sample() -> AllKinds {
    AllKinds {
        flag: true,
        tiny: -8,
        small: 1_600,
        int: -320_000,
        big: 64_000_000_000,
        ubyte: 255,
        ushort: 65_535,
        uint: 4_000_000_000,
        ratio: 0.5,
        score: 99.25,
        label: "hello".into(),
        blob: vec![0, 1, 2, 255],
        doc: serde_json::json!({"a": [1, 2]}),
        created_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        local_at: chrono::NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap(),
        key: uuid::Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0),
        note: Some("n".into()),
        maybe_count: None,
    }
}

/// Column names and one row holding every field of `src`.
fn row_of(meta: &EntityMeta, accessor: &dyn FieldAccessor, src: &AllKinds) -> BufferedRows {
    let columns: Vec<String> = meta.columns().iter().map(|c| c.column_name.clone()).collect();
    let values = (0..columns.len())
        .map(|i| accessor.field(src, meta, i).unwrap())
        .collect();
    BufferedRows::new(columns, vec![values])
}

#[test]
fn field_reads_every_kind() {
    let registry = Registry::new();
    let meta = registry.get::<AllKinds>().unwrap();
    let src = sample();

    for strategy in strategies() {
        let accessor = strategy.accessor();
        let read = |name: &str| accessor.field_by_name(&src, &meta, name).unwrap();

        assert_eq!(read("flag"), Value::Bool(true));
        assert_eq!(read("tiny"), Value::Int(-8));
        assert_eq!(read("uint"), Value::Int(4_000_000_000));
        assert_eq!(read("ratio"), Value::Float(0.5));
        assert_eq!(read("label"), Value::Text("hello".into()));
        assert_eq!(read("blob"), Value::Bytes(vec![0, 1, 2, 255]));
        assert_eq!(read("key"), Value::Uuid(src.key));
        assert_eq!(read("note"), Value::Text("n".into()));
        assert_eq!(read("maybe_count"), Value::Null);
    }
}

#[test]
fn strategies_populate_identical_entities() {
    let registry = Registry::new();
    let meta = registry.get::<AllKinds>().unwrap();
    let src = sample();

    let mut populated = Vec::new();
    for strategy in strategies() {
        let accessor = strategy.accessor();
        let mut rows = row_of(&meta, accessor.as_ref(), &src);
        assert!(rows.advance());

        let mut dst = AllKinds::default();
        accessor.populate_from_row(&mut dst, &meta, &mut rows).unwrap();
        assert_eq!(dst, src, "{strategy:?}");
        for i in 0..meta.columns().len() {
            assert_eq!(
                accessor.field(&dst, &meta, i).unwrap(),
                accessor.field(&src, &meta, i).unwrap()
            );
        }
        populated.push(dst);
    }
    assert!(populated.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn partial_rows_leave_other_fields_untouched() {
    let registry = Registry::new();
    let meta = registry.get::<AuditEntry>().unwrap();

    for strategy in strategies() {
        let accessor = strategy.accessor();
        let mut rows = BufferedRows::new(["KIND"], vec![vec![Value::from("login")]]);
        assert!(rows.advance());

        let mut dst = AuditEntry {
            id: 7,
            cached: true,
            ..Default::default()
        };
        accessor.populate_from_row(&mut dst, &meta, &mut rows).unwrap();
        assert_eq!(dst.id, 7);
        assert_eq!(dst.event_kind, "login");
        assert_eq!(dst.user_id, None);
        assert!(dst.cached);
    }
}

#[test]
fn unknown_result_column_is_rejected() {
    let registry = Registry::new();
    let meta = registry.get::<User>().unwrap();

    for strategy in strategies() {
        let mut rows = BufferedRows::new(["id", "email"], vec![vec![Value::Int(1), Value::from("x")]]);
        assert!(rows.advance());

        let mut dst = User::default();
        let err = strategy
            .accessor()
            .populate_from_row(&mut dst, &meta, &mut rows)
            .unwrap_err();
        assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "email"));
    }
}

#[test]
fn wider_rows_fail_before_decoding() {
    /// Cursor that panics if asked to decode.
    struct NoDecode(Vec<String>);

    impl RowCursor for NoDecode {
        fn columns(&self) -> &[String] {
            &self.0
        }
        fn advance(&mut self) -> bool {
            true
        }
        fn decode(&mut self, _: &mut [Slot]) -> OrmResult<()> {
            panic!("decode must not run");
        }
    }

    let registry = Registry::new();
    let meta = registry.get::<User>().unwrap();
    let mut rows = NoDecode(vec!["id".into(), "name".into(), "extra".into()]);

    for strategy in strategies() {
        let mut dst = User::default();
        let err = strategy
            .accessor()
            .populate_from_row(&mut dst, &meta, &mut rows)
            .unwrap_err();
        assert!(matches!(
            err,
            OrmError::TooManyColumns {
                returned: 3,
                mapped: 2
            }
        ));
    }
}

#[test]
fn mismatched_value_is_a_decode_error() {
    let registry = Registry::new();
    let meta = registry.get::<User>().unwrap();

    for strategy in strategies() {
        let mut rows = BufferedRows::new(["id"], vec![vec![Value::from("not a number")]]);
        assert!(rows.advance());

        let mut dst = User::default();
        let err = strategy
            .accessor()
            .populate_from_row(&mut dst, &meta, &mut rows)
            .unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "id"));
    }
}

#[test]
fn decode_errors_name_the_column_for_every_strategy() {
    let registry = Registry::new();
    let meta = registry.get::<Reading>().unwrap();

    for strategy in strategies() {
        let mut rows = BufferedRows::new(["Level"], vec![vec![Value::Int(1000)]]);
        assert!(rows.advance());

        let mut dst = Reading::default();
        let err = strategy
            .accessor()
            .populate_from_row(&mut dst, &meta, &mut rows)
            .unwrap_err();
        assert!(
            matches!(err, OrmError::Decode { ref column, .. } if column == "Level"),
            "{strategy:?}: {err}"
        );
        assert_eq!(dst, Reading::default());
    }
}

#[test]
fn default_strategy_is_reflect() {
    assert_eq!(AccessorStrategy::default(), AccessorStrategy::Reflect);
    assert_eq!(OrmConfig::new().accessor, AccessorStrategy::Reflect);
}

#[test]
fn metadata_of_another_type_is_rejected() {
    let registry = Registry::new();
    let user_meta = registry.get::<User>().unwrap();
    let audit = AuditEntry::default();

    for strategy in strategies() {
        let err = strategy.accessor().field(&audit, &user_meta, 0).unwrap_err();
        assert!(matches!(err, OrmError::EntityMismatch { expected: "User" }));
    }
}

#[test]
fn out_of_range_index_is_unknown_field() {
    let registry = Registry::new();
    let meta = registry.get::<User>().unwrap();
    let user = User::new(1, "a");

    for strategy in strategies() {
        let err = strategy.accessor().field(&user, &meta, 9).unwrap_err();
        assert!(matches!(err, OrmError::UnknownField(_)));
    }
}
