pub mod errors;
pub mod field_path;
pub mod deep_equal;
pub mod comparison;
pub mod iter;
pub mod context;
pub mod field_ref;
pub mod condition;
pub mod operators;  // one file per operator family
pub mod query;
pub mod engine;
mod matching;

pub use condition::Condition;
pub use engine::{execute, is_match, make_field_reference, CompiledCondition, Engine};
pub use errors::{EvalError, FieldPathError, Result};
pub use field_ref::{field, FieldReference};
