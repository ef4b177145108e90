//! Recursive condition evaluator.
use tracing::trace;

use crate::condition::{Clause, Condition, FieldClause};
use crate::context::{MatchContext, Node};
use crate::errors::{EvalError, Result};
use crate::iter::all_match;
use crate::operators::equality::node_equals;

pub(crate) fn eval_at(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    match condition {
        Condition::Equals(literal) => Ok(node_equals(ctx.current(), &Node::borrowed(literal))),
        Condition::Clauses(clauses) => all_match(clauses, |clause, _| eval_clause(ctx, clause)),
    }
}

fn eval_clause(ctx: &MatchContext<'_>, clause: &Clause) -> Result<bool> {
    match clause {
        Clause::Operator(operator) => {
            let result = operator.evaluate(ctx)?;
            trace!(
                operator = operator.name(),
                value = %ctx.current().describe(),
                path = %ctx.path_string(),
                result,
                "operator result"
            );
            Ok(result)
        }
        Clause::Field(field) => {
            if !ctx.current().accepts_field_clauses() {
                return Err(EvalError::NonObjectSubCondition(ctx.current().describe()));
            }
            check_exists_then(&ctx.for_path(&field.name)?, field)
        }
    }
}

/// Settle `$exists` and field absence before running the field's condition.
pub(crate) fn check_exists_then(ctx: &MatchContext<'_>, field: &FieldClause) -> Result<bool> {
    let exists = ctx.current_field_exists();
    match field.exists {
        Some(expected) if !expected || !exists => Ok(expected == exists),
        None if !exists => Ok(false),
        _ => eval_at(ctx, &field.condition),
    }
}
