//! Boolean operators.

use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::sync::Arc;

/// Negates the boolean produced by its operand.
#[derive(Debug)]
pub struct Not {
    inner: BoxedOperator,
}

impl Not {
    pub fn new(inner: BoxedOperator) -> Self {
        Not { inner }
    }
}

impl Operator for Not {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        match self.inner.eval(input, ctx)? {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(Value::Bool(!b))),
            Some(other) => Err(EvalError::type_mismatch("not", "bool", other.kind())),
        }
    }
}

/// `true` iff the input is the zero value of its kind.
#[derive(Debug)]
pub struct Zero;

impl Operator for Zero {
    fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
        Ok(Some(Value::Bool(input.is_zero())))
    }
}

fn build_not(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut ops = util::operator_args("not", args)?;
    match ops.pop() {
        Some(inner) => Ok(Arc::new(Not::new(inner))),
        None => Err(ParseError::invalid_arguments("not", "expects an operator")),
    }
}

fn build_zero(_args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    Ok(Arc::new(Zero))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![
        Arc::new(OperatorDefinition {
            name: "not",
            arity: Arity::Fixed(1),
            build: build_not,
        }),
        Arc::new(OperatorDefinition {
            name: "zero",
            arity: Arity::Fixed(0),
            build: build_zero,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn eval(op: &dyn Operator, input: Value) -> EvalResult {
        op.eval(input, &EvalContext::detached())
    }

    #[test]
    fn zero_values() {
        assert_eq!(eval(&Zero, Value::from("")), Ok(Some(Value::Bool(true))));
        assert_eq!(eval(&Zero, Value::Float64(0.0)), Ok(Some(Value::Bool(true))));
        assert_eq!(eval(&Zero, Value::List(vec![])), Ok(Some(Value::Bool(true))));
        assert_eq!(eval(&Zero, Value::Int64(-1)), Ok(Some(Value::Bool(false))));
    }

    #[test]
    fn not_requires_bool() {
        #[derive(Debug)]
        struct Echo;
        impl Operator for Echo {
            fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
                Ok(Some(input))
            }
        }

        let not = Not::new(Arc::new(Echo));
        assert_eq!(eval(&not, Value::Bool(true)), Ok(Some(Value::Bool(false))));
        assert_eq!(
            eval(&not, Value::Int32(1)),
            Err(EvalError::type_mismatch("not", "bool", ValueKind::Int32))
        );
    }
}
