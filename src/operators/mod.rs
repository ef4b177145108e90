//! The operator table.
//!
//! Every operator key parses to one [`Operator`] variant. Negated keys
//! (`$ne`, `$gte`, `$lte`, `$nin`, `$nor`, `$noneMatch`, `$containsNone`)
//! parse to [`Operator::Negated`] around their sibling.
use std::borrow::Cow;

use regex::Regex;
use serde_json::Value;

use crate::condition::{Condition, FieldClause};
use crate::context::{MatchContext, Node};
use crate::errors::{EvalError, Result};
use crate::field_ref::FieldReference;

pub mod array;
pub mod equality;
pub mod logical;
pub mod object;
pub mod ordering;
pub mod set;
pub mod string;
pub mod types;

use types::TypeTag;

/// A literal value or a reference resolved against the match context.
#[derive(Debug, Clone)]
pub enum Operand {
    Literal(Value),
    Field(FieldReference),
}

impl Operand {
    pub fn parse(operand: &Value) -> Result<Self> {
        Ok(match FieldReference::detect(operand)? {
            Some(reference) => Operand::Field(reference),
            None => Operand::Literal(operand.clone()),
        })
    }

    pub fn resolve<'a>(&'a self, ctx: &MatchContext<'a>) -> Result<Node<'a>> {
        match self {
            Operand::Literal(value) => Ok(Node::borrowed(value)),
            Operand::Field(reference) => Ok(ctx.resolve_reference(reference)?.current().clone()),
        }
    }
}

/// Operand of the set and containment operators.
#[derive(Debug, Clone)]
pub enum ListOperand {
    Items(Vec<Operand>),
    /// A reference expected to resolve to an array.
    Field(FieldReference),
}

impl ListOperand {
    pub fn parse(operator: &'static str, operand: &Value) -> Result<Self> {
        if let Some(reference) = FieldReference::detect(operand)? {
            return Ok(ListOperand::Field(reference));
        }
        match operand {
            Value::Array(items) => items
                .iter()
                .map(Operand::parse)
                .collect::<Result<Vec<_>>>()
                .map(ListOperand::Items),
            other => Err(EvalError::invalid_operand(
                operator,
                format!("expected an array or a field reference, found: {other}"),
            )),
        }
    }

    /// A reference to an absent or `null` field is an empty list.
    pub fn resolve<'a>(&'a self, ctx: &MatchContext<'a>) -> Result<Vec<Node<'a>>> {
        let reference = match self {
            ListOperand::Items(items) => return items.iter().map(|item| item.resolve(ctx)).collect(),
            ListOperand::Field(reference) => reference,
        };
        match ctx.resolve_reference(reference)?.current().clone() {
            node if node.is_nullish() => Ok(Vec::new()),
            Node::Value(Cow::Borrowed(Value::Array(items))) => Ok(items.iter().map(Node::borrowed).collect()),
            Node::Value(Cow::Owned(Value::Array(items))) => Ok(items.into_iter().map(Node::owned).collect()),
            other => Err(EvalError::NonIterable(format!(
                "expected array, but found: {}",
                other.describe()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Operator {
    /// `None` when the operand was not an array; never matches.
    And(Option<Vec<Condition>>),
    Or(Option<Vec<Condition>>),
    Not(Box<Condition>),
    Eq(Operand),
    Gt(Operand),
    Lt(Operand),
    In(ListOperand),
    Type(TypeTag, Option<Box<Condition>>),
    /// Applied by the enclosing field clause, always `true` here.
    Exists(bool),
    IndexAsArray(Box<Condition>),
    IndexEntries(Vec<FieldClause>),
    EntryKey(Box<Condition>),
    EntryValue(Box<Condition>),
    Eqi(Operand),
    Contains(Operand),
    StartsWith(Operand),
    EndsWith(Operand),
    Regexp(Regex),
    CharAt(usize, Box<Condition>),
    Length(Box<Condition>),
    ContainsAll(ListOperand),
    ContainsSame(ListOperand),
    ContainsSome(ListOperand),
    AllMatch(Box<Condition>),
    SomeMatch(Box<Condition>),
    SingleMatch(Box<Condition>),
    ElementAt(usize, Box<Condition>),
    Size(Box<Condition>),
    Negated(Box<Operator>),
}

fn sub_condition(operand: &Value) -> Result<Box<Condition>> {
    Condition::parse(operand).map(Box::new)
}

/// `[index, condition]`
fn indexed_condition(operator: &'static str, operand: &Value) -> Result<(usize, Box<Condition>)> {
    match operand.as_array().map(Vec::as_slice) {
        Some([index, condition]) => {
            let index = index
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| {
                    EvalError::invalid_operand(operator, format!("invalid index: {index}"))
                })?;
            Ok((index, sub_condition(condition)?))
        }
        _ => Err(EvalError::invalid_operand(
            operator,
            format!("expected [index, condition], found: {operand}"),
        )),
    }
}

impl Operator {
    pub fn parse(key: &str, operand: &Value) -> Result<Self> {
        let operator = match key {
            "$and" => Operator::And(logical::branches(operand)?),
            "$or" => Operator::Or(logical::branches(operand)?),
            "$nor" => Operator::Or(logical::branches(operand)?).negated(),
            "$not" => Operator::Not(sub_condition(operand)?),
            "$eq" => Operator::Eq(Operand::parse(operand)?),
            "$ne" => Operator::Eq(Operand::parse(operand)?).negated(),
            "$gt" => Operator::Gt(Operand::parse(operand)?),
            "$gte" => Operator::Lt(Operand::parse(operand)?).negated(),
            "$lt" => Operator::Lt(Operand::parse(operand)?),
            "$lte" => Operator::Gt(Operand::parse(operand)?).negated(),
            "$in" => Operator::In(ListOperand::parse("$in", operand)?),
            "$nin" => Operator::In(ListOperand::parse("$nin", operand)?).negated(),
            "$type" => types::parse(operand)?,
            "$exists" => Operator::Exists(object::parse_exists(operand)?),
            "$indexAsArray" => Operator::IndexAsArray(sub_condition(operand)?),
            "$indexEntries" => Operator::IndexEntries(object::parse_index_entries(operand)?),
            "$key" => Operator::EntryKey(sub_condition(operand)?),
            "$value" => Operator::EntryValue(sub_condition(operand)?),
            "$eqi" => Operator::Eqi(Operand::parse(operand)?),
            "$contains" => Operator::Contains(Operand::parse(operand)?),
            "$startsWith" => Operator::StartsWith(Operand::parse(operand)?),
            "$endsWith" => Operator::EndsWith(Operand::parse(operand)?),
            "$regexp" => Operator::Regexp(string::parse_regexp(operand)?),
            "$charAt" => {
                let (index, condition) = indexed_condition("$charAt", operand)?;
                Operator::CharAt(index, condition)
            }
            "$length" => Operator::Length(sub_condition(operand)?),
            "$containsAll" => Operator::ContainsAll(ListOperand::parse("$containsAll", operand)?),
            "$containsSame" => Operator::ContainsSame(ListOperand::parse("$containsSame", operand)?),
            "$containsSome" => Operator::ContainsSome(ListOperand::parse("$containsSome", operand)?),
            "$containsNone" => {
                Operator::ContainsSome(ListOperand::parse("$containsNone", operand)?).negated()
            }
            "$allMatch" => Operator::AllMatch(sub_condition(operand)?),
            "$someMatch" => Operator::SomeMatch(sub_condition(operand)?),
            "$singleMatch" => Operator::SingleMatch(sub_condition(operand)?),
            "$noneMatch" => Operator::SomeMatch(sub_condition(operand)?).negated(),
            "$elementAt" => {
                let (index, condition) = indexed_condition("$elementAt", operand)?;
                Operator::ElementAt(index, condition)
            }
            "$size" => Operator::Size(sub_condition(operand)?),
            _ => return Err(EvalError::UnknownOperator(key.to_string())),
        };
        Ok(operator)
    }

    fn negated(self) -> Self {
        Operator::Negated(Box::new(self))
    }

    /// The key this operator was parsed from.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::And(_) => "$and",
            Operator::Or(_) => "$or",
            Operator::Not(_) => "$not",
            Operator::Eq(_) => "$eq",
            Operator::Gt(_) => "$gt",
            Operator::Lt(_) => "$lt",
            Operator::In(_) => "$in",
            Operator::Type(..) => "$type",
            Operator::Exists(_) => "$exists",
            Operator::IndexAsArray(_) => "$indexAsArray",
            Operator::IndexEntries(_) => "$indexEntries",
            Operator::EntryKey(_) => "$key",
            Operator::EntryValue(_) => "$value",
            Operator::Eqi(_) => "$eqi",
            Operator::Contains(_) => "$contains",
            Operator::StartsWith(_) => "$startsWith",
            Operator::EndsWith(_) => "$endsWith",
            Operator::Regexp(_) => "$regexp",
            Operator::CharAt(..) => "$charAt",
            Operator::Length(_) => "$length",
            Operator::ContainsAll(_) => "$containsAll",
            Operator::ContainsSame(_) => "$containsSame",
            Operator::ContainsSome(_) => "$containsSome",
            Operator::AllMatch(_) => "$allMatch",
            Operator::SomeMatch(_) => "$someMatch",
            Operator::SingleMatch(_) => "$singleMatch",
            Operator::ElementAt(..) => "$elementAt",
            Operator::Size(_) => "$size",
            Operator::Negated(inner) => match inner.as_ref() {
                Operator::Eq(_) => "$ne",
                Operator::Lt(_) => "$gte",
                Operator::Gt(_) => "$lte",
                Operator::In(_) => "$nin",
                Operator::Or(_) => "$nor",
                Operator::SomeMatch(_) => "$noneMatch",
                Operator::ContainsSome(_) => "$containsNone",
                _ => "$not",
            },
        }
    }

    pub(crate) fn evaluate(&self, ctx: &MatchContext<'_>) -> Result<bool> {
        match self {
            Operator::And(branches) => logical::and(ctx, branches.as_deref()),
            Operator::Or(branches) => logical::or(ctx, branches.as_deref()),
            Operator::Not(condition) => logical::not(ctx, condition),
            Operator::Eq(operand) => equality::eq(ctx, operand),
            Operator::Gt(operand) => ordering::gt(ctx, operand),
            Operator::Lt(operand) => ordering::lt(ctx, operand),
            Operator::In(list) => set::is_in(ctx, list),
            Operator::Type(tag, condition) => types::has_type(ctx, *tag, condition.as_deref()),
            Operator::Exists(_) => Ok(true),
            Operator::IndexAsArray(condition) => object::index_as_array(ctx, condition),
            Operator::IndexEntries(clauses) => object::index_entries(ctx, clauses),
            Operator::EntryKey(condition) => object::entry_key(ctx, condition),
            Operator::EntryValue(condition) => object::entry_value(ctx, condition),
            Operator::Eqi(operand) => string::eqi(ctx, operand),
            Operator::Contains(operand) => string::contains(ctx, operand),
            Operator::StartsWith(operand) => string::starts_with(ctx, operand),
            Operator::EndsWith(operand) => string::ends_with(ctx, operand),
            Operator::Regexp(regex) => string::regexp(ctx, regex),
            Operator::CharAt(index, condition) => string::char_at(ctx, *index, condition),
            Operator::Length(condition) => string::length(ctx, condition),
            Operator::ContainsAll(list) => array::contains_all(ctx, list),
            Operator::ContainsSame(list) => array::contains_same(ctx, list),
            Operator::ContainsSome(list) => array::contains_some(ctx, list),
            Operator::AllMatch(condition) => array::all_match(ctx, condition),
            Operator::SomeMatch(condition) => array::some_match(ctx, condition),
            Operator::SingleMatch(condition) => array::single_match(ctx, condition),
            Operator::ElementAt(index, condition) => array::element_at(ctx, *index, condition),
            Operator::Size(condition) => array::size(ctx, condition),
            Operator::Negated(inner) => Ok(!inner.evaluate(ctx)?),
        }
    }
}
