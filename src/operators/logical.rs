use serde_json::Value;

use crate::condition::Condition;
use crate::context::MatchContext;
use crate::errors::Result;
use crate::iter::{all_match, any_match};
use crate::matching::eval_at;

/// Branches of `$and`/`$or`/`$nor`; `None` for a non-array operand.
pub(crate) fn branches(operand: &Value) -> Result<Option<Vec<Condition>>> {
    match operand {
        Value::Array(items) => items.iter().map(Condition::parse).collect::<Result<_>>().map(Some),
        _ => Ok(None),
    }
}

pub fn and(ctx: &MatchContext<'_>, branches: Option<&[Condition]>) -> Result<bool> {
    match branches {
        Some(branches) => all_match(branches, |condition, _| eval_at(ctx, condition)),
        None => Ok(false),
    }
}

pub fn or(ctx: &MatchContext<'_>, branches: Option<&[Condition]>) -> Result<bool> {
    match branches {
        Some(branches) => any_match(branches, |condition, _| eval_at(ctx, condition)),
        None => Ok(false),
    }
}

pub fn not(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    Ok(!eval_at(ctx, condition)?)
}
