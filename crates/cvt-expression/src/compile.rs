//! Compiled pipelines.
//!
//! A pipeline expression is parsed once into a tree of operators, which can
//! then be run any number of times against different inputs and contexts.

use crate::error::ParseError;
use crate::eval_ctx::EvalContext;
use crate::parser::PipelineParser;
use crate::registry::{default_registry, Registry};
use crate::types::{BoxedOperator, EvalResult};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A parsed pipeline expression, cheap to clone and share.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<str>,
    root: BoxedOperator,
}

impl Pipeline {
    /// Parses `source` against `registry`.
    pub fn compile(source: &str, registry: &Registry) -> Result<Pipeline, ParseError> {
        let root = PipelineParser::parse(source, registry)?;
        tracing::debug!(pipeline = source, "compiled pipeline");
        Ok(Pipeline {
            source: Arc::from(source),
            root,
        })
    }

    /// Parses `source` against the process-wide registry.
    pub fn compile_default(source: &str) -> Result<Pipeline, ParseError> {
        Pipeline::compile(source, default_registry())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn operator(&self) -> &BoxedOperator {
        &self.root
    }

    pub fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        self.root.eval(input, ctx)
    }

    /// Runs the pipeline with no source record and no declared field type.
    pub fn eval_detached(&self, input: Value) -> EvalResult {
        self.root.eval(input, &EvalContext::detached())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_and_run() {
        let pipeline = Pipeline::compile_default("split(;)|map(int64)").unwrap();
        assert_eq!(pipeline.source(), "split(;)|map(int64)");
        assert_eq!(
            pipeline.eval_detached(Value::from("1;2")),
            Ok(Some(Value::List(vec![Value::Int64(1), Value::Int64(2)])))
        );
    }

    #[test]
    fn compile_is_deterministic() {
        let registry = Registry::with_builtins();
        let a = Pipeline::compile("split(,)|filter(!zero)", &registry).unwrap();
        let b = Pipeline::compile("split(,)|filter(!zero)", &registry).unwrap();
        assert_eq!(format!("{:?}", a.operator()), format!("{:?}", b.operator()));
    }
}
