use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Largest integer a double can hold exactly.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Runtime type of a value, as seen by `$type` and the ordering operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    /// An integer outside the exactly-representable double range.
    BigInt,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if is_big_integer(n) => ValueKind::BigInt,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

fn is_big_integer(n: &Number) -> bool {
    if let Some(i) = n.as_i64() {
        i.unsigned_abs() > MAX_SAFE_INTEGER
    } else {
        n.as_u64().is_some_and(|u| u > MAX_SAFE_INTEGER)
    }
}

/// Order two JSON numbers: exact for integers, `f64` once a float is involved.
pub fn cmp_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    if !a.is_f64() && !b.is_f64() {
        // one side is negative, the other is above i64::MAX
        return Some(if a.is_i64() {
            Ordering::Less
        } else {
            Ordering::Greater
        });
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Type-strict ordering.
///
/// `pred_on_ord` only runs when both sides are non-null scalars of the same
/// runtime kind; every other combination is `false`.
pub fn cmp_values<F>(a: &Value, b: &Value, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    if ValueKind::of(a) != ValueKind::of(b) {
        return false;
    }
    let ord = match (a, b) {
        (Value::String(sa), Value::String(sb)) => Some(sa.cmp(sb)),
        (Value::Number(na), Value::Number(nb)) => cmp_numbers(na, nb),
        (Value::Bool(ba), Value::Bool(bb)) => Some(ba.cmp(bb)),
        _ => None,
    };
    ord.is_some_and(pred_on_ord)
}
