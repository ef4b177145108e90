use serde_json::Value;

use crate::condition::{Condition, FieldClause};
use crate::context::{MatchContext, Node};
use crate::errors::{EvalError, Result};
use crate::iter::all_match;
use crate::matching::{check_exists_then, eval_at};

pub(crate) fn parse_exists(operand: &Value) -> Result<bool> {
    operand.as_bool().ok_or_else(|| {
        EvalError::invalid_operand("$exists", format!("expected a boolean, found: {operand}"))
    })
}

/// Keys are taken literally: no path splitting, no operator meaning.
pub(crate) fn parse_index_entries(operand: &Value) -> Result<Vec<FieldClause>> {
    match operand {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, condition)| FieldClause::parse(key, condition))
            .collect(),
        other => Err(EvalError::invalid_operand(
            "$indexEntries",
            format!("expected an object, found: {other}"),
        )),
    }
}

/// Match the current object's entries as an iteration target.
pub fn index_as_array(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    match ctx.current() {
        Node::Absent => Ok(false),
        Node::Value(value) => match value.as_ref() {
            Value::Object(object) => {
                eval_at(&ctx.derive(Node::Indexed(object), "$indexAsArray")?, condition)
            }
            Value::Null => Ok(false),
            other => Err(EvalError::NonIterable(format!(
                "cannot index a non-object: {other}"
            ))),
        },
        other => Err(EvalError::NonIterable(format!(
            "cannot index a non-object: {}",
            other.describe()
        ))),
    }
}

pub fn index_entries(ctx: &MatchContext<'_>, clauses: &[FieldClause]) -> Result<bool> {
    if !matches!(ctx.current_value(), Some(Value::Object(_))) {
        return Err(EvalError::NonObjectSubCondition(ctx.current().describe()));
    }
    all_match(clauses, |clause, _| {
        check_exists_then(&ctx.for_name(&clause.name)?, clause)
    })
}

pub fn entry_key(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Node::Entry(entry) = ctx.current() else {
        return Ok(false);
    };
    let key = Node::owned(Value::String(entry.key.to_string()));
    eval_at(&ctx.derive(key, "$key")?, condition)
}

pub fn entry_value(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Node::Entry(entry) = ctx.current() else {
        return Ok(false);
    };
    eval_at(&ctx.derive(Node::borrowed(entry.value), "$value")?, condition)
}
