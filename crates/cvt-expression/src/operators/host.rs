//! Host-registered functions adapted into operators.

use crate::error::ParseError;
use crate::eval_ctx::EvalContext;
use crate::registry::HostFn;
use crate::types::{Arg, BoxedOperator, EvalResult, Operator, OperatorFactory};
use crate::util;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A host function bound to the literal arguments it was written with.
pub struct HostFunction {
    name: String,
    args: Vec<String>,
    func: Arc<HostFn>,
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Operator for HostFunction {
    fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
        (self.func)(input, &self.args).map(Some)
    }
}

/// Constructor for [`HostFunction`]; accepts any number of literals.
pub struct HostFunctionFactory {
    name: String,
    func: Arc<HostFn>,
}

impl HostFunctionFactory {
    pub fn new(name: String, func: Arc<HostFn>) -> Self {
        HostFunctionFactory { name, func }
    }
}

impl OperatorFactory for HostFunctionFactory {
    fn create(&self, args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
        let args = util::literal_args(&self.name, args)?;
        Ok(Arc::new(HostFunction {
            name: self.name.clone(),
            args,
            func: Arc::clone(&self.func),
        }))
    }
}
