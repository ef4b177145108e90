//! Query execution: filtered projections of a value.
//!
//! A query is `true`/`false`, or an object holding field subqueries and/or
//! the structural keys below. `None` stands for an absent result.
use serde_json::{Map, Value};

use crate::condition::{is_operator_key, Condition};
use crate::errors::{EvalError, Result};
use crate::iter::{self, ItChain};

pub const INCLUDE_IF: &str = "$includeIf";
pub const FILTER: &str = "$filter";
pub const ELEMENT_QUERY: &str = "$elementQuery";
pub const INDEXED_QUERY: &str = "$indexedQuery";
pub const AS_ARRAY: &str = "$asArray";

/// A query object split into its parts.
#[derive(Debug, Default)]
struct QuerySpec<'q> {
    include_if: Option<&'q Value>,
    filter: Option<&'q Value>,
    element_query: Option<&'q Value>,
    indexed_query: Option<&'q Value>,
    as_array: bool,
    fields: Vec<(&'q str, &'q Value)>,
}

impl<'q> QuerySpec<'q> {
    fn parse(query: &'q Map<String, Value>) -> Result<Self> {
        let mut spec = QuerySpec::default();
        for (key, sub) in query {
            match key.as_str() {
                INCLUDE_IF => spec.include_if = Some(sub),
                FILTER => spec.filter = Some(sub),
                ELEMENT_QUERY => spec.element_query = Some(sub),
                INDEXED_QUERY => spec.indexed_query = Some(sub),
                AS_ARRAY => {
                    spec.as_array = sub.as_bool().ok_or_else(|| {
                        EvalError::InvalidQuery(format!("{AS_ARRAY} must be a boolean, found: {sub}"))
                    })?
                }
                key if is_operator_key(key) => {
                    return Err(EvalError::InvalidQuery(format!("unknown query key: {key}")))
                }
                key => spec.fields.push((key, sub)),
            }
        }
        if spec.is_structural() && !spec.fields.is_empty() {
            return Err(EvalError::InvalidQuery(format!(
                "field subqueries cannot be combined with {FILTER}, {ELEMENT_QUERY} or {INDEXED_QUERY}"
            )));
        }
        if spec.as_array && !spec.is_index_query() {
            return Err(EvalError::InvalidQuery(format!(
                "{AS_ARRAY} requires {FILTER} or {INDEXED_QUERY}"
            )));
        }
        Ok(spec)
    }

    fn is_structural(&self) -> bool {
        self.filter.is_some() || self.element_query.is_some() || self.indexed_query.is_some()
    }

    fn is_index_query(&self) -> bool {
        (self.filter.is_some() || self.indexed_query.is_some()) && self.element_query.is_none()
    }

    fn is_array_query(&self) -> bool {
        (self.filter.is_some() || self.element_query.is_some())
            && self.indexed_query.is_none()
            && !self.as_array
    }

    /// An `$includeIf` gate wins over every other key: an included value
    /// passes through whole.
    fn is_value_query(&self) -> bool {
        self.include_if.is_some()
    }
}

pub(crate) fn execute_query(value: &Value, query: &Value) -> Result<Option<Value>> {
    if value.is_null() {
        return Ok(Some(Value::Null));
    }
    if !passes(value, query)? {
        return Ok(None);
    }
    shape(value, query).map(Some)
}

/// The inclusion gate: `false`, or an `$includeIf` that does not match.
fn passes(value: &Value, query: &Value) -> Result<bool> {
    match query {
        Value::Bool(include) => Ok(*include),
        Value::Object(spec) => match spec.get(INCLUDE_IF) {
            Some(condition) => Condition::parse(condition)?.matches(value),
            None => Ok(true),
        },
        _ => Ok(true),
    }
}

fn unknown_query(value: &Value, query: &Value) -> EvalError {
    EvalError::UnknownQuery {
        value: value.to_string(),
        query: query.to_string(),
    }
}

/// Project a value that already passed its gate.
fn shape(value: &Value, query: &Value) -> Result<Value> {
    let spec = match query {
        Value::Bool(_) => return Ok(value.clone()),
        Value::Object(object) => QuerySpec::parse(object)?,
        _ => return Err(unknown_query(value, query)),
    };
    if spec.is_value_query() || value.is_null() {
        return Ok(value.clone());
    }
    match value {
        Value::Array(elements) if spec.is_array_query() => array_query(elements, &spec),
        Value::Object(object) if spec.is_index_query() => index_query(object, &spec),
        Value::Object(object) if !spec.is_structural() => subquery(object, &spec),
        _ => Err(unknown_query(value, query)),
    }
}

fn array_query(elements: &[Value], spec: &QuerySpec<'_>) -> Result<Value> {
    let filter = spec.filter.map(Condition::parse).transpose()?;
    let kept = iter::filter(elements, |element, _| match &filter {
        Some(condition) => condition.matches(element),
        None => Ok(true),
    })?;
    let Some(element_query) = spec.element_query else {
        return Ok(Value::Array(kept.into_iter().cloned().collect()));
    };
    kept.into_iter()
        .map(|element| Ok(execute_query(element, element_query)?.unwrap_or(Value::Null)))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn index_query(object: &Map<String, Value>, spec: &QuerySpec<'_>) -> Result<Value> {
    let filter = spec.filter.map(Condition::parse).transpose()?;
    let indexed_query = spec.indexed_query;
    let project = move |value: &Value| match indexed_query {
        Some(query) => execute_query(value, query),
        None => Ok(Some(value.clone())),
    };
    let entries = ItChain::entries_of(object)
        .maybe_filter(filter, |condition, (key, value), _| condition.matches_entry(key, value));

    if spec.as_array {
        return entries
            .reduce(Vec::new(), |mut values, (_, value), _| {
                values.push(project(value)?.unwrap_or(Value::Null));
                Ok(values)
            })
            .map(Value::Array);
    }
    entries
        .map(move |(key, value), _| Ok((key, project(value)?)))
        .filter(|(_, projected), _| Ok(projected.is_some()))
        .to_index(|(key, _)| key.to_string(), |(_, projected)| Ok(projected.unwrap_or(Value::Null)))
        .map(Value::Object)
}

fn subquery(object: &Map<String, Value>, spec: &QuerySpec<'_>) -> Result<Value> {
    ItChain::from(spec.fields.iter().copied())
        .reduce(Map::new(), |mut result, (key, sub), _| {
            if let Some(field) = object.get(key) {
                if passes(field, sub)? {
                    result.insert(key.to_string(), shape(field, sub)?);
                }
            }
            Ok(result)
        })
        .map(Value::Object)
}
