//! Navigation context: an immutable cursor into a value tree.
//!
//! A context knows its current node, the path that led to it, whether the
//! field it stands for exists in its container, and its parent and root.
//! Contexts are only created by descending from an existing context, so the
//! parent chain never forms a cycle.
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::errors::{EvalError, Result};
use crate::field_path;
use crate::field_ref::FieldReference;

/// Synthetic `{ key, value }` pairing used when an object's entries are
/// iterated like array elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectEntry<'v> {
    pub key: &'v str,
    pub value: &'v Value,
}

impl ObjectEntry<'_> {
    pub fn to_value(&self) -> Value {
        json!({ "key": self.key, "value": self.value })
    }
}

/// What a context points at.
#[derive(Debug, Clone)]
pub enum Node<'v> {
    /// Nothing: the field or element is not there.
    Absent,
    Value(Cow<'v, Value>),
    Entry(ObjectEntry<'v>),
    /// An object viewed as a sequence of its entries (`$indexAsArray`).
    Indexed(&'v Map<String, Value>),
}

impl<'v> Node<'v> {
    pub fn borrowed(value: &'v Value) -> Self {
        Node::Value(Cow::Borrowed(value))
    }

    pub fn owned(value: Value) -> Self {
        Node::Value(Cow::Owned(value))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    /// Absent or `null`.
    pub fn is_nullish(&self) -> bool {
        match self {
            Node::Absent => true,
            Node::Value(value) => value.is_null(),
            _ => false,
        }
    }

    /// Whether field names can be applied to this node.
    pub fn is_object_shaped(&self) -> bool {
        matches!(self.as_value(), Some(Value::Object(_) | Value::Array(_)))
    }

    /// Whether a field clause may look into this node. Besides objects and
    /// arrays, nullish and indexed nodes qualify: their fields are all absent.
    pub fn accepts_field_clauses(&self) -> bool {
        self.is_object_shaped() || self.is_nullish() || matches!(self, Node::Indexed(_))
    }

    /// JSON rendering for messages and logs.
    pub fn describe(&self) -> String {
        match self {
            Node::Absent => "undefined".to_string(),
            Node::Value(value) => value.to_string(),
            Node::Entry(entry) => entry.to_value().to_string(),
            Node::Indexed(map) => format!("$indexAsArray({} entries)", map.len()),
        }
    }
}

fn select<'v>(
    value: &Cow<'v, Value>,
    pick: impl for<'a> Fn(&'a Value) -> Option<&'a Value>,
) -> Option<Cow<'v, Value>> {
    match value {
        Cow::Borrowed(value) => pick(value).map(Cow::Borrowed),
        Cow::Owned(value) => pick(value).cloned().map(Cow::Owned),
    }
}

#[derive(Clone)]
pub struct MatchContext<'v>(Rc<Frame<'v>>);

struct Frame<'v> {
    current: Node<'v>,
    path: Vec<String>,
    exists: bool,
    parent: Option<MatchContext<'v>>,
    // `None` for the root itself
    root: Option<MatchContext<'v>>,
}

impl fmt::Debug for MatchContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchContext")
            .field("current", &self.0.current)
            .field("path", &self.0.path)
            .field("exists", &self.0.exists)
            .finish()
    }
}

impl<'v> MatchContext<'v> {
    /// A fresh root context for a caller-supplied value.
    pub fn of(root: &'v Value) -> Self {
        Self::root_of(Node::borrowed(root))
    }

    pub(crate) fn root_of(current: Node<'v>) -> Self {
        let exists = !current.is_absent();
        Self(Rc::new(Frame {
            current,
            path: Vec::new(),
            exists,
            parent: None,
            root: None,
        }))
    }

    pub fn current(&self) -> &Node<'v> {
        &self.0.current
    }

    pub fn current_value(&self) -> Option<&Value> {
        self.0.current.as_value()
    }

    pub fn current_path(&self) -> &[String] {
        &self.0.path
    }

    /// `false` exactly when the field or element is missing from its container.
    pub fn current_field_exists(&self) -> bool {
        self.0.exists
    }

    pub fn parent(&self) -> Option<&MatchContext<'v>> {
        self.0.parent.as_ref()
    }

    pub fn root(&self) -> &MatchContext<'v> {
        self.0.root.as_ref().unwrap_or(self)
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    pub fn path_string(&self) -> String {
        field_path::join(&self.0.path)
    }

    /// Descend into a field. `key` must be a string or an integer.
    pub fn for_field(&self, key: &Value) -> Result<Self> {
        match key {
            Value::String(name) => self.for_name(name),
            Value::Number(n) if n.is_i64() || n.is_u64() => self.for_name(&n.to_string()),
            other => Err(self.error(format!("unsupported key kind: {other}"))),
        }
    }

    /// Descend into a field by name, without any path syntax.
    ///
    /// `null` and `$indexAsArray` targets have no fields: the child is absent.
    pub fn for_name(&self, name: &str) -> Result<Self> {
        let child = match self.current() {
            Node::Indexed(_) => None,
            Node::Value(value) => match value.as_ref() {
                Value::Null => None,
                Value::Object(_) => select(value, |v| v.get(name)),
                Value::Array(_) => match name.parse::<usize>() {
                    Ok(index) => select(value, |v| v.get(index)),
                    Err(_) => None,
                },
                other => {
                    return Err(self.error(format!(
                        "cannot derive from a non-object context: {other}"
                    )))
                }
            },
            other => {
                return Err(self.error(format!(
                    "cannot derive from a non-object context: {}",
                    other.describe()
                )))
            }
        };
        let exists = child.is_some();
        Ok(self.sub(child.map_or(Node::Absent, Node::Value), name, exists))
    }

    /// Descend along a relative path such as `a.b."c.d"`.
    ///
    /// Once a segment is missing, every deeper context is a non-existent one.
    pub fn for_path(&self, path: &str) -> Result<Self> {
        if path.starts_with('^') || path.starts_with("../") {
            return Err(self.error(format!("invalid field path: {path}")));
        }
        self.resolve_segments(&field_path::split(path)?)
    }

    /// Descend into an array element, or a string's character.
    pub fn for_element(&self, index: usize) -> Result<Self> {
        if !self.current_field_exists() {
            return Ok(self.sub(Node::Absent, index.to_string(), false));
        }
        let child = match self.current() {
            Node::Value(value) => match value.as_ref() {
                Value::Array(_) => select(value, |v| v.get(index)),
                Value::String(s) => s
                    .chars()
                    .nth(index)
                    .map(|c| Cow::Owned(Value::String(c.to_string()))),
                other => {
                    return Err(self.error(format!(
                        "expected current to be array, but found: {other}"
                    )))
                }
            },
            other => {
                return Err(self.error(format!(
                    "expected current to be array, but found: {}",
                    other.describe()
                )))
            }
        };
        let exists = child.is_some();
        Ok(self.sub(child.map_or(Node::Absent, Node::Value), index.to_string(), exists))
    }

    /// Derive an arbitrary sub-context. The current field must exist.
    pub fn derive(&self, node: Node<'v>, segment: impl Into<String>) -> Result<Self> {
        if !self.current_field_exists() {
            return Err(self.error("cannot derive from a context of a field which does not exist"));
        }
        let exists = !node.is_absent();
        Ok(self.sub(node, segment, exists))
    }

    /// Resolve a reference: `^a.b` from the root, `../a` from the parent,
    /// anything else from here.
    pub fn resolve_reference(&self, reference: &FieldReference) -> Result<Self> {
        self.resolve_prefixed(&reference.path)
    }

    fn resolve_prefixed(&self, path: &str) -> Result<Self> {
        if let Some(rest) = path.strip_prefix('^') {
            self.root().resolve_segments(&field_path::split(rest)?)
        } else if let Some(rest) = path.strip_prefix("../") {
            let parent = self
                .parent()
                .ok_or_else(|| self.error("cannot get parent of root context"))?;
            parent.resolve_prefixed(rest)
        } else {
            self.resolve_segments(&field_path::split(path)?)
        }
    }

    fn resolve_segments(&self, segments: &[String]) -> Result<Self> {
        let mut context = self.clone();
        for segment in segments {
            context = if context.current_field_exists() {
                context.for_name(segment)?
            } else {
                context.sub(Node::Absent, segment.as_str(), false)
            };
        }
        Ok(context)
    }

    fn sub(&self, current: Node<'v>, segment: impl Into<String>, exists: bool) -> Self {
        let mut path = self.0.path.clone();
        path.push(segment.into());
        Self(Rc::new(Frame {
            current,
            path,
            exists,
            parent: Some(self.clone()),
            root: Some(self.root().clone()),
        }))
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::Navigation {
            message: message.into(),
            path: self.path_string(),
        }
    }
}
