//! Reading fields of the source record.

use crate::error::ParseError;
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::sync::Arc;

/// `from(F)` reads one field; `from(F1,F2,...)` reads several into a list.
/// The piped-in value is ignored.
#[derive(Debug)]
pub struct FromFields {
    fields: Vec<String>,
}

impl Operator for FromFields {
    fn eval(&self, _input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        if let [field] = self.fields.as_slice() {
            return ctx.field(field).map(Some);
        }
        let values = self
            .fields
            .iter()
            .map(|field| ctx.field(field))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Value::List(values)))
    }
}

fn build_from(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let fields = util::literal_args("from", args)?;
    Ok(Arc::new(FromFields { fields }))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![Arc::new(OperatorDefinition {
        name: "from",
        arity: Arity::Range(1, None),
        build: build_from,
    })]
}
