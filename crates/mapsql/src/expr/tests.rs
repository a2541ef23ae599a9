use super::*;

#[test]
fn comparison_wraps_literal_as_value() {
    let p = col("age").gt(18);
    assert_eq!(p.op(), Op::Gt);
    assert_eq!(p.left.as_deref(), Some(&Expr::Column(col("age"))));
    assert_eq!(*p.right, Expr::Value(Value::Int(18)));
}

#[test]
fn comparison_keeps_expression_operands() {
    let p = col("a").eq(col("b"));
    assert_eq!(*p.right, Expr::Column(col("b")));

    let p = avg("age").ge(raw("(SELECT 30)", vec![]));
    assert!(matches!(*p.right, Expr::Raw(_)));
}

#[test]
fn not_has_empty_left() {
    let p = not(col("x").eq(5));
    assert_eq!(p.op(), Op::Not);
    assert!(p.left.is_none());
    assert!(matches!(*p.right, Expr::Predicate(_)));
}

#[test]
fn all_folds_left_to_right() {
    let folded = Predicate::all([col("a").eq(1), col("b").eq(2), col("c").eq(3)]).unwrap();
    let expected = col("a").eq(1).and(col("b").eq(2)).and(col("c").eq(3));
    assert_eq!(folded, expected);
    assert!(Predicate::all(Vec::new()).is_none());
}

#[test]
fn precedence_orders_logical_operators() {
    assert!(Op::Or.precedence() < Op::And.precedence());
    assert!(Op::And.precedence() < Op::Not.precedence());
    assert!(Op::Not.precedence() < Op::Eq.precedence());
}

#[test]
fn option_literal_becomes_null() {
    assert_eq!(None::<i32>.into_expr(), Expr::Value(Value::Null));
    assert_eq!(assign("name", Some("x")).column(), "name");
}
