//! Record construction.

use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::resolve::resolve_record_type;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::sync::Arc;

/// Builds a new record of the named type from a list of values.
///
/// `obj(T)` fills fields in declaration order. `obj(T,F1,F2,...)` writes list
/// slot `i` into field `Fi`; slots beyond the named fields are ignored. The
/// type is looked up in the declared type of the field being computed.
#[derive(Debug)]
pub struct Obj {
    type_name: String,
    targets: Vec<String>,
}

impl Operator for Obj {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let record_type = resolve_record_type(&self.type_name, ctx.field_type)?;
        let slots = util::expect_list("obj", input)?;
        let mut record = record_type.instantiate();
        if self.targets.is_empty() {
            let fields = record_type.fields();
            if slots.len() > fields.len() {
                return Err(EvalError::conversion(format!(
                    "{} values do not fit the {} fields of {}",
                    slots.len(),
                    fields.len(),
                    record_type.name()
                )));
            }
            for (field, value) in fields.iter().zip(slots) {
                record.set_field(field.name(), value)?;
            }
        } else {
            for (target, value) in self.targets.iter().zip(slots) {
                record.set_field(target, value)?;
            }
        }
        Ok(Some(Value::Record(Arc::from(record))))
    }
}

fn build_obj(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut literals = util::literal_args("obj", args)?.into_iter();
    let Some(type_name) = literals.next() else {
        return Err(ParseError::invalid_arguments("obj", "expects a type name"));
    };
    Ok(Arc::new(Obj {
        type_name,
        targets: literals.collect(),
    }))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![Arc::new(OperatorDefinition {
        name: "obj",
        arity: Arity::Range(1, None),
        build: build_obj,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolvable_type() {
        let op = build_obj(vec![Arg::Literal("Reward".into())]).unwrap();
        let err = op
            .eval(Value::List(vec![]), &EvalContext::detached())
            .unwrap_err();
        assert_eq!(err, EvalError::conversion("type not found: Reward"));
    }
}
