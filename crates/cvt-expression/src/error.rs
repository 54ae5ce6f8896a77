use crate::value::ValueKind;
use thiserror::Error;

/// Failure while turning a pipeline expression into an operator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("syntax error at offset {pos}: {message}")]
    Syntax { pos: usize, message: String },

    #[error("unknown operator \"{name}\" at offset {pos}")]
    UnknownOperator { name: String, pos: usize },

    #[error("\"{operator}\" {message}")]
    InvalidArguments { operator: String, message: String },

    /// A literal sat where `operator` needs a nested operator.
    #[error("\"{operator}\" expects an operator argument, got literal {literal:?}")]
    ExpectedOperator { operator: String, literal: String },
}

impl ParseError {
    pub fn syntax(pos: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            pos,
            message: message.into(),
        }
    }

    pub fn invalid_arguments(operator: &str, message: impl Into<String>) -> Self {
        ParseError::InvalidArguments {
            operator: operator.to_string(),
            message: message.into(),
        }
    }
}

/// Failure while running an operator against a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("invalid field name: {record}.{field}")]
    FieldNotFound { record: String, field: String },

    #[error("{0}")]
    Conversion(String),

    #[error("\"{operator}\" expects {expected}, got {found}")]
    TypeMismatch {
        operator: String,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("\"{name}\" failed: {message}")]
    Host { name: String, message: String },
}

impl EvalError {
    pub fn field_not_found(record: &str, field: &str) -> Self {
        EvalError::FieldNotFound {
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    pub fn type_mismatch(operator: &str, expected: &'static str, found: ValueKind) -> Self {
        EvalError::TypeMismatch {
            operator: operator.to_string(),
            expected,
            found,
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        EvalError::Conversion(message.into())
    }
}
