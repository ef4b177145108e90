use serde_json::Value;

use crate::comparison::{cmp_numbers, ValueKind};

/// Recursively test the equality of two values.
///
/// Object key order is ignored, array order and length are not. Numbers are
/// equal when they denote the same quantity (`2 == 2.0`), but a `bigint`
/// never equals a `number`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            ValueKind::of(a) == ValueKind::of(b) && cmp_numbers(x, y).is_some_and(|o| o.is_eq())
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(xi, yi)| deep_equal(xi, yi))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, xv)| y.get(key).is_some_and(|yv| deep_equal(xv, yv)))
        }
        _ => false,
    }
}
