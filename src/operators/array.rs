//! Containment and element-matching operators.
//!
//! They run against an [`IterationTarget`]: an array, a string (as its
//! characters) or an object wrapped by `$indexAsArray`.
use std::borrow::Cow;

use serde_json::{json, Map, Value};

use crate::condition::Condition;
use crate::context::{MatchContext, Node, ObjectEntry};
use crate::deep_equal::deep_equal;
use crate::errors::{EvalError, Result};
use crate::iter;
use crate::matching::eval_at;

use super::equality::node_equals;
use super::ListOperand;

/// What a match operator steps through.
#[derive(Debug, Clone, Copy)]
pub enum MatchElement<'a> {
    Element(usize),
    Entry(ObjectEntry<'a>),
}

pub trait IterationTarget<'a> {
    /// Bare elements, compared by the containment operators.
    fn for_containment(&self) -> Box<dyn Iterator<Item = Cow<'a, Value>> + 'a>;
    fn for_match(&self) -> Box<dyn Iterator<Item = MatchElement<'a>> + 'a>;
    fn size(&self) -> usize;
}

struct Sequence<'a>(&'a [Value]);

impl<'a> IterationTarget<'a> for Sequence<'a> {
    fn for_containment(&self) -> Box<dyn Iterator<Item = Cow<'a, Value>> + 'a> {
        let items = self.0;
        Box::new(items.iter().map(Cow::Borrowed))
    }

    fn for_match(&self) -> Box<dyn Iterator<Item = MatchElement<'a>> + 'a> {
        Box::new((0..self.0.len()).map(MatchElement::Element))
    }

    fn size(&self) -> usize {
        self.0.len()
    }
}

struct Characters<'a>(&'a str);

impl<'a> IterationTarget<'a> for Characters<'a> {
    fn for_containment(&self) -> Box<dyn Iterator<Item = Cow<'a, Value>> + 'a> {
        let s = self.0;
        Box::new(s.chars().map(|c| Cow::Owned(Value::String(c.to_string()))))
    }

    fn for_match(&self) -> Box<dyn Iterator<Item = MatchElement<'a>> + 'a> {
        Box::new((0..self.size()).map(MatchElement::Element))
    }

    fn size(&self) -> usize {
        self.0.chars().count()
    }
}

struct IndexedObject<'a>(&'a Map<String, Value>);

impl<'a> IterationTarget<'a> for IndexedObject<'a> {
    fn for_containment(&self) -> Box<dyn Iterator<Item = Cow<'a, Value>> + 'a> {
        let object = self.0;
        Box::new(object.values().map(Cow::Borrowed))
    }

    fn for_match(&self) -> Box<dyn Iterator<Item = MatchElement<'a>> + 'a> {
        let object = self.0;
        Box::new(
            object
                .iter()
                .map(|(key, value)| MatchElement::Entry(ObjectEntry { key, value })),
        )
    }

    fn size(&self) -> usize {
        self.0.len()
    }
}

/// `None` for an absent or `null` target.
fn target_of<'a>(node: &'a Node<'_>) -> Result<Option<Box<dyn IterationTarget<'a> + 'a>>> {
    let target: Box<dyn IterationTarget<'a> + 'a> = match node {
        Node::Absent => return Ok(None),
        Node::Indexed(object) => Box::new(IndexedObject(*object)),
        Node::Value(value) => match value.as_ref() {
            Value::Null => return Ok(None),
            Value::Array(items) => Box::new(Sequence(items)),
            Value::String(s) => Box::new(Characters(s)),
            other => return Err(EvalError::NonIterable(other.to_string())),
        },
        Node::Entry(_) => return Err(EvalError::NonIterable(node.describe())),
    };
    Ok(Some(target))
}

fn element_context<'a>(ctx: &MatchContext<'a>, element: MatchElement<'a>) -> Result<MatchContext<'a>> {
    match element {
        MatchElement::Element(index) => ctx.for_element(index),
        MatchElement::Entry(entry) => ctx.derive(Node::Entry(entry), entry.key),
    }
}

fn equals_element(node: &Node<'_>, element: &Value) -> bool {
    match node.as_value() {
        Some(value) => deep_equal(value, element),
        None => node_equals(node, &Node::borrowed(element)),
    }
}

pub fn contains_all(ctx: &MatchContext<'_>, list: &ListOperand) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    let expected = list.resolve(ctx)?;
    let elements: Vec<_> = target.for_containment().collect();
    Ok(expected
        .iter()
        .all(|e| elements.iter().any(|element| equals_element(e, element))))
}

/// Equal as multisets: each expected value pairs with exactly one element.
pub fn contains_same(ctx: &MatchContext<'_>, list: &ListOperand) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    let expected = list.resolve(ctx)?;
    if target.size() != expected.len() {
        return Ok(false);
    }
    let mut consumed = vec![false; expected.len()];
    for element in target.for_containment() {
        let pair = (0..expected.len()).find(|&i| !consumed[i] && equals_element(&expected[i], &element));
        match pair {
            Some(i) => consumed[i] = true,
            None => return Ok(false),
        }
    }
    Ok(true)
}

pub fn contains_some(ctx: &MatchContext<'_>, list: &ListOperand) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    let expected = list.resolve(ctx)?;
    Ok(target
        .for_containment()
        .any(|element| expected.iter().any(|e| equals_element(e, &element))))
}

pub fn all_match(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    iter::all_match(target.for_match(), |element, _| {
        eval_at(&element_context(ctx, element)?, condition)
    })
}

pub fn some_match(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    iter::any_match(target.for_match(), |element, _| {
        eval_at(&element_context(ctx, element)?, condition)
    })
}

pub fn single_match(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    iter::single_match(target.for_match(), |element, _| {
        eval_at(&element_context(ctx, element)?, condition)
    })
}

pub fn element_at(ctx: &MatchContext<'_>, index: usize, condition: &Condition) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    match iter::element_at(target.for_match(), index) {
        Some(element) => eval_at(&element_context(ctx, element)?, condition),
        None => Ok(false),
    }
}

pub fn size(ctx: &MatchContext<'_>, condition: &Condition) -> Result<bool> {
    let Some(target) = target_of(ctx.current())? else {
        return Ok(false);
    };
    let size = Node::owned(json!(target.size()));
    eval_at(&ctx.derive(size, "length")?, condition)
}
