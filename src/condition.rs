use regex::Regex;
use serde_json::Value;

use crate::context::{MatchContext, Node, ObjectEntry};
use crate::errors::Result;
use crate::matching::eval_at;
use crate::operators::{object, Operator};

/// Leading character of every operator key.
pub const SIGIL: char = '$';

pub fn is_operator_key(key: &str) -> bool {
    key.starts_with(SIGIL)
}

/// A parsed condition expression.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Anything that is not an object: implicit equality.
    Equals(Value),
    /// Every clause must hold.
    Clauses(Vec<Clause>),
}

#[derive(Debug, Clone)]
pub enum Clause {
    Operator(Operator),
    Field(FieldClause),
}

/// A named field and the condition its value must satisfy.
#[derive(Debug, Clone)]
pub struct FieldClause {
    pub name: String,
    /// The nested condition's `$exists`, checked before anything else.
    pub exists: Option<bool>,
    pub condition: Condition,
}

impl Condition {
    pub fn parse(value: &Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Ok(Condition::Equals(value.clone()));
        };
        object
            .iter()
            .map(|(key, operand)| {
                if is_operator_key(key) {
                    Operator::parse(key, operand).map(Clause::Operator)
                } else {
                    FieldClause::parse(key, operand).map(Clause::Field)
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Condition::Clauses)
    }

    /// `$regexp` with an already compiled pattern.
    pub fn regexp(pattern: Regex) -> Self {
        Condition::Clauses(vec![Clause::Operator(Operator::Regexp(pattern))])
    }

    /// `{name: condition}` for a field path.
    pub fn field(name: impl Into<String>, condition: Condition) -> Self {
        Condition::Clauses(vec![Clause::Field(FieldClause {
            name: name.into(),
            exists: None,
            condition,
        })])
    }

    pub fn matches(&self, value: &Value) -> Result<bool> {
        eval_at(&MatchContext::of(value), self)
    }

    /// Match against the synthetic `{key, value}` pairing of an object entry.
    pub fn matches_entry(&self, key: &str, value: &Value) -> Result<bool> {
        eval_at(&MatchContext::root_of(Node::Entry(ObjectEntry { key, value })), self)
    }
}

impl FieldClause {
    pub(crate) fn parse(name: &str, condition: &Value) -> Result<Self> {
        let exists = match condition.get("$exists") {
            Some(operand) => Some(object::parse_exists(operand)?),
            None => None,
        };
        Ok(Self {
            name: name.to_string(),
            exists,
            condition: Condition::parse(condition)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalError;
    use serde_json::json;

    #[test]
    fn non_objects_are_equality_literals() {
        for literal in [json!(3), json!("x"), json!(null), json!([1, 2])] {
            assert!(matches!(Condition::parse(&literal).unwrap(), Condition::Equals(v) if v == literal));
        }
    }

    #[test]
    fn splits_operators_from_fields() {
        let condition = Condition::parse(&json!({"$gt": 1, "a": {"$exists": false}})).unwrap();
        let Condition::Clauses(clauses) = condition else {
            panic!("expected clauses");
        };
        assert_eq!(clauses.len(), 2);
        assert!(clauses.iter().any(|c| matches!(c, Clause::Operator(Operator::Gt(_)))));
        assert!(clauses
            .iter()
            .any(|c| matches!(c, Clause::Field(f) if f.name == "a" && f.exists == Some(false))));
    }

    #[test]
    fn rejects_unknown_operators_and_bad_exists() {
        assert!(matches!(
            Condition::parse(&json!({"$nope": 1})),
            Err(EvalError::UnknownOperator(k)) if k == "$nope"
        ));
        assert!(matches!(
            Condition::parse(&json!({"a": {"$exists": "yes"}})),
            Err(EvalError::InvalidOperand { operator: "$exists", .. })
        ));
    }

    #[test]
    fn compiled_patterns() {
        let pattern = regex::RegexBuilder::new("^ab+c$").case_insensitive(true).build().unwrap();
        let condition = Condition::regexp(pattern);
        assert!(condition.matches(&json!("ABbc")).unwrap());
        assert!(!condition.matches(&json!("abd")).unwrap());
        assert!(!condition.matches(&json!(12)).unwrap());

        let nested = Condition::field("user.name", Condition::regexp(Regex::new("^j").unwrap()));
        assert!(nested.matches(&json!({"user": {"name": "jo"}})).unwrap());
        assert!(!nested.matches(&json!({"user": {"name": "al"}})).unwrap());
        assert!(!nested.matches(&json!({"user": {}})).unwrap());
    }

    #[test]
    fn matches_entries() {
        let condition = Condition::parse(&json!({"$key": "a", "$value": {"$gt": 1}})).unwrap();
        assert!(condition.matches_entry("a", &json!(2)).unwrap());
        assert!(!condition.matches_entry("b", &json!(2)).unwrap());
        assert!(!condition.matches(&json!({"key": "a", "value": 2})).unwrap());
    }
}
