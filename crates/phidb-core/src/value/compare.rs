use crate::value::Value;
use std::cmp::Ordering;

/// Null-aware comparator shared by predicates, HAVING and extrema slots.
///
/// Ordering rules:
/// 1. Any comparison involving `Null` is undefined.
/// 2. `Int` and `Float` compare numerically after widening.
/// 3. Text and booleans compare only within their own family.
///
/// Returns `None` when the pair is not comparable; callers treat that as a
/// non-match.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Equality under the same rules as [`compare_order`].
#[must_use]
pub fn compare_eq(left: &Value, right: &Value) -> Option<bool> {
    compare_order(left, right).map(Ordering::is_eq)
}
