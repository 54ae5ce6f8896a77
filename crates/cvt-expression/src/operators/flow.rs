//! Pipeline composition.

use crate::error::ParseError;
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::sync::Arc;

/// Threads a value through each stage in turn, stopping at the first stage
/// that produces nothing.
#[derive(Debug)]
pub struct Sequence {
    stages: Vec<BoxedOperator>,
}

impl Sequence {
    pub fn new(stages: Vec<BoxedOperator>) -> Self {
        Sequence { stages }
    }
}

impl Operator for Sequence {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let mut value = input;
        for stage in &self.stages {
            match stage.eval(value, ctx)? {
                Some(next) => value = next,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }
}

fn build_sequence(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let stages = util::operator_args("sequence", args)?;
    Ok(Arc::new(Sequence::new(stages)))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![Arc::new(OperatorDefinition {
        name: "sequence",
        arity: Arity::Range(1, None),
        build: build_sequence,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::logical::Zero;

    #[derive(Debug)]
    struct Nothing;

    impl Operator for Nothing {
        fn eval(&self, _input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
            Ok(None)
        }
    }

    #[test]
    fn absent_short_circuits() {
        let seq = Sequence::new(vec![Arc::new(Nothing), Arc::new(Zero)]);
        assert_eq!(seq.eval(Value::Int32(0), &EvalContext::detached()), Ok(None));
        let seq = Sequence::new(vec![Arc::new(Zero)]);
        assert_eq!(
            seq.eval(Value::Int32(0), &EvalContext::detached()),
            Ok(Some(Value::Bool(true)))
        );
    }

    #[test]
    fn literal_stage_is_rejected() {
        let err = build_sequence(vec![Arg::Literal("x".into())]).unwrap_err();
        assert!(matches!(err, ParseError::ExpectedOperator { .. }));
    }
}
