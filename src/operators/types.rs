use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::comparison::ValueKind;
use crate::condition::Condition;
use crate::context::MatchContext;
use crate::errors::{EvalError, Result};
use crate::matching::eval_at;

use super::Operator;

/// Tags accepted by `$type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    BigInt,
}

impl TypeTag {
    pub fn matches(self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (TypeTag::String, ValueKind::String)
                | (TypeTag::Number, ValueKind::Number)
                | (TypeTag::Boolean, ValueKind::Boolean)
                | (TypeTag::BigInt, ValueKind::BigInt)
        )
    }
}

impl FromStr for TypeTag {
    type Err = EvalError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "string" => Ok(TypeTag::String),
            "number" => Ok(TypeTag::Number),
            "boolean" => Ok(TypeTag::Boolean),
            "bigint" => Ok(TypeTag::BigInt),
            other => Err(EvalError::invalid_operand("$type", format!("unknown type: {other}"))),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::BigInt => "bigint",
        })
    }
}

/// `"tag"` or `["tag", condition]`
pub(crate) fn parse(operand: &Value) -> Result<Operator> {
    match operand {
        Value::String(tag) => Ok(Operator::Type(tag.parse()?, None)),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(tag), condition] => Ok(Operator::Type(
                tag.parse()?,
                Some(Box::new(Condition::parse(condition)?)),
            )),
            _ => Err(EvalError::invalid_operand(
                "$type",
                format!("expected [type, condition], found: {operand}"),
            )),
        },
        other => Err(EvalError::invalid_operand(
            "$type",
            format!("expected a type name, found: {other}"),
        )),
    }
}

pub fn has_type(ctx: &MatchContext<'_>, tag: TypeTag, condition: Option<&Condition>) -> Result<bool> {
    let Some(value) = ctx.current_value() else {
        return Ok(false);
    };
    if !tag.matches(ValueKind::of(value)) {
        return Ok(false);
    }
    match condition {
        Some(condition) => eval_at(ctx, condition),
        None => Ok(true),
    }
}
