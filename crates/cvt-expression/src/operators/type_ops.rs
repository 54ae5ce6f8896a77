//! Numeric parsers: `int`, `int32`, `int64`, `float32`, `float64`.

use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::value::{Value, ValueKind};
use std::str::FromStr;
use std::sync::Arc;

/// Parses a string, or casts a number, into one numeric kind.
#[derive(Debug)]
pub struct ParseNumber {
    target: ValueKind,
}

fn parse<T: FromStr>(text: &str, target: ValueKind) -> Result<T, EvalError> {
    text.parse::<T>()
        .map_err(|_| EvalError::conversion(format!("failed to convert {text:?} to {target}")))
}

impl ParseNumber {
    fn parse_text(&self, text: &str) -> Result<Value, EvalError> {
        Ok(match self.target {
            ValueKind::Int => Value::Int(parse::<i64>(text, self.target)?),
            ValueKind::Int32 => Value::Int32(parse::<i32>(text, self.target)?),
            ValueKind::Int64 => Value::Int64(parse::<i64>(text, self.target)?),
            ValueKind::Float32 => Value::Float32(parse::<f32>(text, self.target)?),
            _ => Value::Float64(parse::<f64>(text, self.target)?),
        })
    }

    fn cast(&self, value: Value) -> Result<Value, EvalError> {
        let name = self.target.name();
        macro_rules! cast {
            ($n:expr) => {
                match self.target {
                    ValueKind::Int => Value::Int($n as i64),
                    ValueKind::Int32 => Value::Int32($n as i32),
                    ValueKind::Int64 => Value::Int64($n as i64),
                    ValueKind::Float32 => Value::Float32($n as f32),
                    _ => Value::Float64($n as f64),
                }
            };
        }
        Ok(match value {
            Value::Int(n) | Value::Int64(n) => cast!(n),
            Value::Int32(n) => cast!(n),
            Value::Float32(f) => cast!(f),
            Value::Float64(f) => cast!(f),
            other => {
                return Err(EvalError::type_mismatch(
                    name,
                    "string or number",
                    other.kind(),
                ))
            }
        })
    }
}

impl Operator for ParseNumber {
    fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
        match input {
            Value::Str(text) => self.parse_text(&text).map(Some),
            other => self.cast(other).map(Some),
        }
    }
}

macro_rules! number_parsers {
    ($($build:ident => $name:literal, $kind:ident);* $(;)?) => {
        $(
            fn $build(_args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
                Ok(Arc::new(ParseNumber { target: ValueKind::$kind }))
            }
        )*

        pub fn operators() -> Vec<Arc<OperatorDefinition>> {
            vec![
                $(
                    Arc::new(OperatorDefinition {
                        name: $name,
                        arity: Arity::Fixed(0),
                        build: $build,
                    }),
                )*
            ]
        }
    };
}

number_parsers! {
    build_int => "int", Int;
    build_int32 => "int32", Int32;
    build_int64 => "int64", Int64;
    build_float32 => "float32", Float32;
    build_float64 => "float64", Float64;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: ValueKind, input: Value) -> EvalResult {
        ParseNumber { target: kind }.eval(input, &EvalContext::detached())
    }

    #[test]
    fn parses_strings() {
        assert_eq!(run(ValueKind::Int, Value::from("-12")), Ok(Some(Value::Int(-12))));
        assert_eq!(run(ValueKind::Int32, Value::from("50002")), Ok(Some(Value::Int32(50002))));
        assert_eq!(run(ValueKind::Float32, Value::from("1e3")), Ok(Some(Value::Float32(1000.0))));
        assert_eq!(run(ValueKind::Float64, Value::from("0.25")), Ok(Some(Value::Float64(0.25))));
    }

    #[test]
    fn rejects_bad_text() {
        assert_eq!(
            run(ValueKind::Int32, Value::from("1.5")),
            Err(EvalError::conversion("failed to convert \"1.5\" to int32"))
        );
        assert!(run(ValueKind::Int64, Value::from(" 1")).is_err());
        assert!(run(ValueKind::Int32, Value::from("3000000000")).is_err());
    }

    #[test]
    fn casts_numbers() {
        assert_eq!(run(ValueKind::Int64, Value::Int32(7)), Ok(Some(Value::Int64(7))));
        assert_eq!(run(ValueKind::Int32, Value::Float64(2.9)), Ok(Some(Value::Int32(2))));
        assert!(matches!(
            run(ValueKind::Float64, Value::Bool(true)),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
