//! String operators.

use crate::error::ParseError;
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::sync::Arc;

/// Splits a string on a separator, optionally converting every piece.
/// An empty string produces nothing.
#[derive(Debug)]
pub struct Split {
    separator: String,
    each: Option<BoxedOperator>,
}

impl Operator for Split {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let text = util::expect_str("split", input)?;
        if text.is_empty() {
            return Ok(None);
        }
        let pieces = text.split(self.separator.as_str()).map(Value::from);
        let Some(each) = &self.each else {
            return Ok(Some(Value::List(pieces.collect())));
        };
        let mut out = Vec::new();
        for piece in pieces {
            let result = each.eval(piece.clone(), ctx)?;
            out.push(util::require_present("split", result, &piece)?);
        }
        Ok(Some(Value::List(out)))
    }
}

fn build_split(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut args = args.into_iter();
    let separator = match args.next() {
        Some(arg) => util::literal_arg("split", arg)?,
        None => return Err(ParseError::invalid_arguments("split", "expects a separator")),
    };
    let each = args
        .next()
        .map(|arg| util::operator_arg("split", arg))
        .transpose()?;
    Ok(Arc::new(Split { separator, each }))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![Arc::new(OperatorDefinition {
        name: "split",
        arity: Arity::Range(1, Some(2)),
        build: build_split,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::value::ValueKind;

    fn split(sep: &str) -> BoxedOperator {
        build_split(vec![Arg::Literal(sep.into())]).unwrap()
    }

    #[test]
    fn keeps_empty_pieces() {
        let out = split(";").eval(Value::from("a;;b"), &EvalContext::detached());
        assert_eq!(
            out,
            Ok(Some(Value::List(vec![
                Value::from("a"),
                Value::from(""),
                Value::from("b")
            ])))
        );
    }

    #[test]
    fn empty_input_is_absent() {
        assert_eq!(split(";").eval(Value::from(""), &EvalContext::detached()), Ok(None));
    }

    #[test]
    fn non_string_input() {
        assert_eq!(
            split(";").eval(Value::Int32(1), &EvalContext::detached()),
            Err(EvalError::type_mismatch("split", "string", ValueKind::Int32))
        );
    }

    #[test]
    fn second_argument_must_be_operator() {
        let err = build_split(vec![Arg::Literal(";".into()), Arg::Literal("x".into())]);
        assert!(matches!(err, Err(ParseError::ExpectedOperator { .. })));
    }
}
