//! Helpers shared by the built-in operators.

use crate::error::{EvalError, ParseError};
use crate::record::DynamicRecord;
use crate::types::{Arg, BoxedOperator};
use crate::value::Value;
use std::sync::Arc;

// ----------------------------------------------------------------- Argument helpers

/// Takes a literal argument, rejecting nested operators.
pub fn literal_arg(operator: &str, arg: Arg) -> Result<String, ParseError> {
    match arg {
        Arg::Literal(s) => Ok(s),
        Arg::Operator(_) => Err(ParseError::invalid_arguments(
            operator,
            "expects a literal argument, got an operator",
        )),
    }
}

/// Takes an operator argument, rejecting plain literals.
pub fn operator_arg(operator: &str, arg: Arg) -> Result<BoxedOperator, ParseError> {
    match arg {
        Arg::Operator(op) => Ok(op),
        Arg::Literal(literal) => Err(ParseError::ExpectedOperator {
            operator: operator.to_string(),
            literal,
        }),
    }
}

pub fn literal_args(operator: &str, args: Vec<Arg>) -> Result<Vec<String>, ParseError> {
    args.into_iter().map(|a| literal_arg(operator, a)).collect()
}

pub fn operator_args(operator: &str, args: Vec<Arg>) -> Result<Vec<BoxedOperator>, ParseError> {
    args.into_iter().map(|a| operator_arg(operator, a)).collect()
}

// ----------------------------------------------------------------- Value helpers

pub fn expect_str(operator: &str, value: Value) -> Result<String, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(EvalError::type_mismatch(operator, "string", other.kind())),
    }
}

pub fn expect_list(operator: &str, value: Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(EvalError::type_mismatch(operator, "list", other.kind())),
    }
}

pub fn expect_record<'v>(
    operator: &str,
    value: &'v Value,
) -> Result<&'v Arc<dyn DynamicRecord>, EvalError> {
    match value {
        Value::Record(record) => Ok(record),
        other => Err(EvalError::type_mismatch(operator, "record", other.kind())),
    }
}

/// Reads `field` of a record element.
pub fn read_field(operator: &str, value: &Value, field: &str) -> Result<Value, EvalError> {
    let record = expect_record(operator, value)?;
    record
        .get_field(field)
        .ok_or_else(|| EvalError::field_not_found(record.record_type().name(), field))
}

/// Fails unless the first element is a record whose type declares `field`.
/// An empty list passes.
pub fn check_field(operator: &str, items: &[Value], field: &str) -> Result<(), EvalError> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let record_type = expect_record(operator, first)?.record_type();
    if record_type.field(field).is_none() {
        return Err(EvalError::field_not_found(record_type.name(), field));
    }
    Ok(())
}

/// Unwraps a sub-operator result that must be present.
pub fn require_present(
    operator: &str,
    result: Option<Value>,
    input: &Value,
) -> Result<Value, EvalError> {
    result.ok_or_else(|| {
        EvalError::conversion(format!(
            "\"{operator}\" produced no value for {} element",
            input.kind()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn literal_and_operator_args() {
        assert_eq!(literal_arg("split", Arg::Literal(":".into())), Ok(":".to_string()));
        let err = operator_arg("map", Arg::Literal("a".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"map\" expects an operator argument, got literal \"a\""
        );
    }

    #[test]
    fn value_expectations() {
        assert_eq!(expect_str("split", Value::from("x")), Ok("x".to_string()));
        assert_eq!(
            expect_list("map", Value::Int32(1)),
            Err(EvalError::type_mismatch("map", "list", ValueKind::Int32))
        );
        assert!(check_field("dict", &[], "ID").is_ok());
        assert!(check_field("dict", &[Value::Int32(1)], "ID").is_err());
    }
}
