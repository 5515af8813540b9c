use crate::value::{
    ArithOp, ArithmeticError, Value, ValueFamily, apply_arith, compare_eq, compare_order, negate,
};
use std::cmp::Ordering;

#[test]
fn compare_order_widens_int_and_float() {
    assert_eq!(
        compare_order(&Value::Int(3), &Value::Float(2.5)),
        Some(Ordering::Greater)
    );
    assert_eq!(compare_eq(&Value::Float(7.0), &Value::Int(7)), Some(true));
}

#[test]
fn compare_involving_null_is_undefined() {
    assert_eq!(compare_eq(&Value::Null, &Value::Null), None);
    assert_eq!(compare_eq(&Value::Null, &Value::from("NY")), None);
    assert_eq!(compare_order(&Value::Int(1), &Value::Null), None);
}

#[test]
fn compare_across_families_is_undefined() {
    assert_eq!(compare_eq(&Value::from("5"), &Value::Int(5)), None);
    assert_eq!(compare_order(&Value::Bool(true), &Value::Int(1)), None);
}

#[test]
fn text_compares_lexicographically() {
    assert_eq!(
        compare_order(&Value::from("CA"), &Value::from("NY")),
        Some(Ordering::Less)
    );
}

#[test]
fn integer_arithmetic_stays_integral_until_overflow() {
    assert_eq!(
        apply_arith(ArithOp::Add, &Value::Int(5), &Value::Int(3)),
        Ok(Value::Int(8))
    );

    let widened = apply_arith(ArithOp::Add, &Value::Int(i64::MAX), &Value::Int(1))
        .expect("overflow should widen instead of failing");
    assert!(matches!(widened, Value::Float(v) if v > 9.2e18));
}

#[test]
fn division_is_true_division() {
    assert_eq!(
        apply_arith(ArithOp::Div, &Value::Int(7), &Value::Int(2)),
        Ok(Value::Float(3.5))
    );
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(
        apply_arith(ArithOp::Div, &Value::Int(7), &Value::Int(0)),
        Err(ArithmeticError::DivisionByZero)
    );
    assert_eq!(
        apply_arith(ArithOp::Div, &Value::Float(1.0), &Value::Float(0.0)),
        Err(ArithmeticError::DivisionByZero)
    );
}

#[test]
fn arithmetic_on_text_is_rejected() {
    let err = apply_arith(ArithOp::Mul, &Value::from("a"), &Value::Int(2))
        .expect_err("text operand should be rejected");

    assert_eq!(
        err,
        ArithmeticError::NonNumeric {
            op: ArithOp::Mul,
            left: ValueFamily::Text,
            right: ValueFamily::Numeric,
        }
    );
}

#[test]
fn null_propagates_through_arithmetic() {
    assert_eq!(
        apply_arith(ArithOp::Sub, &Value::Null, &Value::Int(2)),
        Ok(Value::Null)
    );
    assert_eq!(negate(&Value::Null), Ok(Value::Null));
}

#[test]
fn negate_handles_min_int() {
    assert_eq!(negate(&Value::Int(4)), Ok(Value::Int(-4)));
    assert!(matches!(negate(&Value::Int(i64::MIN)), Ok(Value::Float(_))));
    assert_eq!(
        negate(&Value::from("x")),
        Err(ArithmeticError::NonNumericNegate(ValueFamily::Text))
    );
}

#[test]
fn render_uses_natural_text_forms() {
    assert_eq!(Value::Int(8).render(), "8");
    assert_eq!(Value::Float(8.0).render(), "8.0");
    assert_eq!(Value::Float(2.5).render(), "2.5");
    assert_eq!(Value::Float(f64::NEG_INFINITY).render(), "-inf");
    assert_eq!(Value::Float(f64::INFINITY).render(), "inf");
    assert_eq!(Value::from("NY").render(), "NY");
    assert_eq!(Value::Null.render(), "NULL");
    assert_eq!(Value::Bool(false).render(), "false");
}

#[test]
fn serializes_untagged() {
    let json = serde_json::to_string(&vec![
        Value::from("NY"),
        Value::Int(8),
        Value::Float(2.5),
        Value::Null,
    ])
    .expect("values should serialize");

    assert_eq!(json, r#"["NY",8,2.5,null]"#);
}
