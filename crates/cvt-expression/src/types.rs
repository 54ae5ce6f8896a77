use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Result of running an operator: a value, or `None` when the operator
/// produced nothing.
pub type EvalResult = Result<Option<Value>, EvalError>;

/// An executable pipeline stage. Operators are immutable once constructed and
/// close over their parsed arguments.
pub trait Operator: Send + Sync + fmt::Debug {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult;
}

pub type BoxedOperator = Arc<dyn Operator>;

/// A positional operator argument as written in the expression.
#[derive(Debug, Clone)]
pub enum Arg {
    Literal(String),
    Operator(BoxedOperator),
}

impl Arg {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Arg::Literal(s) => Some(s),
            Arg::Operator(_) => None,
        }
    }

    pub fn as_operator(&self) -> Option<&BoxedOperator> {
        match self {
            Arg::Operator(op) => Some(op),
            Arg::Literal(_) => None,
        }
    }
}

/// Builds an operator from its parsed argument list.
pub trait OperatorFactory: Send + Sync {
    fn create(&self, args: Vec<Arg>) -> Result<BoxedOperator, ParseError>;
}

/// Operator arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// Skip the arity check.
    Any,
    /// Exactly `n` arguments.
    Fixed(usize),
    /// Between `min` and `max` arguments. `None` for max = unlimited.
    Range(usize, Option<usize>),
}

pub type BuildFn = fn(Vec<Arg>) -> Result<BoxedOperator, ParseError>;

/// A built-in operator: its name, accepted arity and constructor.
pub struct OperatorDefinition {
    pub name: &'static str,
    pub arity: Arity,
    pub build: BuildFn,
}

impl OperatorFactory for OperatorDefinition {
    fn create(&self, args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
        assert_arity(self.name, &self.arity, args.len())?;
        (self.build)(args)
    }
}

/// Asserts that an argument list has the correct length.
pub fn assert_arity(operator: &str, arity: &Arity, count: usize) -> Result<(), ParseError> {
    match arity {
        Arity::Any => Ok(()),
        Arity::Fixed(n) => {
            if count != *n {
                Err(ParseError::invalid_arguments(
                    operator,
                    format!("expects {n} arguments, got {count}"),
                ))
            } else {
                Ok(())
            }
        }
        Arity::Range(min, max) => {
            if count < *min {
                Err(ParseError::invalid_arguments(
                    operator,
                    format!("expects at least {min} arguments, got {count}"),
                ))
            } else if let Some(max) = max {
                if count > *max {
                    return Err(ParseError::invalid_arguments(
                        operator,
                        format!("expects at most {max} arguments, got {count}"),
                    ));
                }
                Ok(())
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_messages() {
        assert!(assert_arity("select", &Arity::Fixed(1), 1).is_ok());
        let err = assert_arity("select", &Arity::Fixed(1), 2).unwrap_err();
        assert_eq!(err.to_string(), "\"select\" expects 1 arguments, got 2");
        let err = assert_arity("sort", &Arity::Range(0, Some(2)), 3).unwrap_err();
        assert_eq!(err.to_string(), "\"sort\" expects at most 2 arguments, got 3");
        let err = assert_arity("from", &Arity::Range(1, None), 0).unwrap_err();
        assert_eq!(err.to_string(), "\"from\" expects at least 1 arguments, got 0");
    }
}
