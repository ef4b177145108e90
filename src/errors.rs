use thiserror::Error;

/// A malformed field path string.
///
/// `position` is the character offset of the offending character in `path`,
/// or `-1` when the path is empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path: {detail}\n\tat position {position} of: {path}")]
pub struct FieldPathError {
    pub detail: String,
    pub path: String,
    pub position: isize,
}

impl FieldPathError {
    pub(crate) fn new(detail: impl Into<String>, path: &str, position: isize) -> Self {
        Self {
            detail: detail.into(),
            path: path.to_string(),
            position,
        }
    }
}

// Every failure aborts the whole evaluation; absent data is never an error.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Path(#[from] FieldPathError),

    // Illegal context derivation, `path` is where the context was.
    #[error("{message} (at [{path}])")]
    Navigation { message: String, path: String },

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("invalid operand for {operator}: {message}")]
    InvalidOperand {
        operator: &'static str,
        message: String,
    },

    #[error("non-iterable target: {0}")]
    NonIterable(String),

    #[error("cannot apply sub-condition on non-object. Current value: {0}")]
    NonObjectSubCondition(String),

    #[error("key already exists in index: {0}")]
    DuplicateKey(String),

    #[error("for value {value} given unknown query: {query}")]
    UnknownQuery { value: String, query: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl EvalError {
    pub(crate) fn invalid_operand(operator: &'static str, message: impl Into<String>) -> Self {
        EvalError::InvalidOperand {
            operator,
            message: message.into(),
        }
    }
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
