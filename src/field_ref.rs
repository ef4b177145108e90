use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{EvalError, Result};

pub const FIELD_KEY: &str = "$field";

/// An operand that points somewhere else in the value tree.
///
/// Serializes as `{"$field": "<path>"}`. The path is relative to the context
/// the operand is evaluated in, `^path` is relative to the root and every
/// leading `../` climbs one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldReference {
    #[serde(rename = "$field")]
    pub path: String,
}

/// Wrap a path string. Nothing is validated until the reference is resolved.
pub fn field(path: impl Into<String>) -> FieldReference {
    FieldReference { path: path.into() }
}

impl FieldReference {
    /// Recognize a reference inside a condition operand.
    pub(crate) fn detect(operand: &Value) -> Result<Option<Self>> {
        let Some(path) = operand.as_object().and_then(|o| o.get(FIELD_KEY)) else {
            return Ok(None);
        };
        match path {
            Value::String(path) if !path.is_empty() => Ok(Some(field(path.as_str()))),
            other => Err(EvalError::invalid_operand(
                FIELD_KEY,
                format!("invalid field path: {other}"),
            )),
        }
    }
}

impl From<FieldReference> for Value {
    fn from(reference: FieldReference) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(FIELD_KEY.to_string(), Value::String(reference.path));
        Value::Object(object)
    }
}

impl fmt::Display for FieldReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"{FIELD_KEY}\": {:?}}}", self.path)
    }
}
