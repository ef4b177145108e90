use std::borrow::Cow;

use serde_json::Value;

use crate::context::{MatchContext, Node};
use crate::deep_equal::deep_equal;
use crate::errors::Result;

use super::Operand;

/// The JSON a present node stands for when compared.
fn as_json<'n>(node: &'n Node<'_>) -> Option<Cow<'n, Value>> {
    match node {
        Node::Absent => None,
        Node::Value(value) => Some(Cow::Borrowed(value.as_ref())),
        Node::Entry(entry) => Some(Cow::Owned(entry.to_value())),
        Node::Indexed(object) => Some(Cow::Owned(Value::Object((*object).clone()))),
    }
}

/// Deep equality over nodes. Absent only equals absent.
pub fn node_equals(a: &Node<'_>, b: &Node<'_>) -> bool {
    match (as_json(a), as_json(b)) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal(&a, &b),
        _ => false,
    }
}

pub fn eq(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    let expected = operand.resolve(ctx)?;
    Ok(node_equals(ctx.current(), &expected))
}
