use serde_json::Value;
use tracing::debug;

use crate::condition::Condition;
use crate::errors::Result;
use crate::field_ref::{self, FieldReference};
use crate::query;

/// =========================
/// Public API (Matching)
/// =========================

/// Test `value` against a condition expression.
///
/// Malformed conditions and paths are errors; missing data never is.
pub fn is_match(value: &Value, condition: &Value) -> Result<bool> {
    debug!(%condition, "is_match");
    Condition::parse(condition)?.matches(value)
}

/// Build a `{"$field": path}` operand.
pub fn make_field_reference(path: &str) -> FieldReference {
    field_ref::field(path)
}

/// =========================
/// Public API (Query)
/// =========================

/// Project `value` through a query. `None` means the result is absent.
pub fn execute(value: &Value, query: &Value) -> Result<Option<Value>> {
    debug!(%query, "execute");
    query::execute_query(value, query)
}

/// =========================
/// Compiled conditions
/// =========================

/// A condition parsed once and matched against any number of values.
#[derive(Debug, Clone)]
pub struct CompiledCondition {
    source: Value,
    condition: Condition,
}

impl CompiledCondition {
    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn is_match(&self, value: &Value) -> Result<bool> {
        debug!(condition = %self.source, "compiled is_match");
        self.condition.matches(value)
    }
}

/// Entry point holding no state of its own; every call is configured only
/// by its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn compile(&self, condition: &Value) -> Result<CompiledCondition> {
        Ok(CompiledCondition {
            source: condition.clone(),
            condition: Condition::parse(condition)?,
        })
    }

    pub fn is_match(&self, value: &Value, condition: &Value) -> Result<bool> {
        is_match(value, condition)
    }

    pub fn execute(&self, value: &Value, query: &Value) -> Result<Option<Value>> {
        execute(value, query)
    }
}
