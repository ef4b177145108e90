use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};

use crate::condition::Condition;
use crate::context::{MatchContext, Node};
use crate::errors::{EvalError, Result};
use crate::matching::eval_at;

use super::Operand;

fn current_str<'c>(ctx: &'c MatchContext<'_>) -> Option<&'c str> {
    ctx.current_value().and_then(Value::as_str)
}

/// Both the current value and the operand must be strings.
fn compare_strings(
    ctx: &MatchContext<'_>,
    operand: &Operand,
    test: impl Fn(&str, &str) -> bool,
) -> Result<bool> {
    let Some(current) = current_str(ctx) else {
        return Ok(false);
    };
    let other = operand.resolve(ctx)?;
    Ok(other
        .as_value()
        .and_then(Value::as_str)
        .is_some_and(|other| test(current, other)))
}

pub fn eqi(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_strings(ctx, operand, |a, b| a.to_lowercase() == b.to_lowercase())
}

pub fn contains(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_strings(ctx, operand, |a, b| a.contains(b))
}

pub fn starts_with(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_strings(ctx, operand, |a, b| a.starts_with(b))
}

pub fn ends_with(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_strings(ctx, operand, |a, b| a.ends_with(b))
}

/// Compile the `/source/flags` form.
pub(crate) fn parse_regexp(operand: &Value) -> Result<Regex> {
    let invalid = |message: String| EvalError::invalid_operand("$regexp", message);
    let pattern = operand
        .as_str()
        .ok_or_else(|| invalid(format!("expected a /source/flags string, found: {operand}")))?;
    let (source, flags) = pattern
        .strip_prefix('/')
        .and_then(|body| body.rsplit_once('/'))
        .ok_or_else(|| invalid(format!("expected a /source/flags string, found: {operand}")))?;

    let mut builder = RegexBuilder::new(source);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            // global, sticky and unicode change nothing for a single test
            'g' | 'y' | 'u' => {}
            other => return Err(invalid(format!("unsupported flag: {other}"))),
        }
    }
    builder.build().map_err(|e| invalid(e.to_string()))
}

pub fn regexp(ctx: &MatchContext<'_>, regex: &Regex) -> Result<bool> {
    Ok(current_str(ctx).is_some_and(|s| regex.is_match(s)))
}

pub fn char_at(ctx: &MatchContext<'_>, index: usize, condition: &Condition) -> Result<bool> {
    let Some(s) = current_str(ctx) else {
        return Ok(false);
    };
    if s.chars().nth(index).is_none() {
        return Ok(false);
    }
    eval_at(&ctx.for_element(index)?, condition)
}

pub fn length(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Some(s) = current_str(ctx) else {
        return Ok(false);
    };
    let length = Node::owned(json!(s.chars().count()));
    eval_at(&ctx.derive(length, "length")?, condition)
}
