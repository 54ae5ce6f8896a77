//! List operators.

use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// Applies an operator to every element.
#[derive(Debug)]
pub struct Map {
    each: BoxedOperator,
}

impl Operator for Map {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let items = util::expect_list("map", input)?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let result = self.each.eval(item.clone(), ctx)?;
            out.push(util::require_present("map", result, &item)?);
        }
        Ok(Some(Value::List(out)))
    }
}

/// Keeps the elements for which the predicate yields `true`.
#[derive(Debug)]
pub struct Filter {
    predicate: BoxedOperator,
}

impl Operator for Filter {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let items = util::expect_list("filter", input)?;
        let mut out = Vec::new();
        for item in items {
            match self.predicate.eval(item.clone(), ctx)? {
                Some(Value::Bool(true)) => out.push(item),
                Some(Value::Bool(false)) | None => {}
                Some(other) => {
                    return Err(EvalError::type_mismatch("filter", "bool", other.kind()))
                }
            }
        }
        Ok(Some(Value::List(out)))
    }
}

/// Picks one element by index.
#[derive(Debug)]
pub struct Select {
    index: usize,
}

impl Operator for Select {
    fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
        let mut items = util::expect_list("select", input)?;
        if self.index >= items.len() {
            return Err(EvalError::OutOfBounds {
                index: self.index,
                len: items.len(),
            });
        }
        Ok(Some(items.swap_remove(self.index)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Asc,
    Desc,
}

/// Stable sort, either on the elements themselves or on a field of record
/// elements.
#[derive(Debug)]
pub struct Sort {
    field: Option<String>,
    direction: Direction,
}

#[derive(Debug)]
enum SortKey {
    Int(i64),
    Float(f64),
    Str(String),
}

impl SortKey {
    fn of(value: &Value) -> Result<SortKey, EvalError> {
        match value {
            Value::Bool(b) => Ok(SortKey::Int(i64::from(*b))),
            Value::Int(n) | Value::Int64(n) => Ok(SortKey::Int(*n)),
            Value::Int32(n) => Ok(SortKey::Int(i64::from(*n))),
            Value::Float32(f) => Ok(SortKey::Float(f64::from(*f))),
            Value::Float64(f) => Ok(SortKey::Float(*f)),
            Value::Str(s) => Ok(SortKey::Str(s.clone())),
            other => Err(EvalError::conversion(format!(
                "don't know how to order type {}",
                other.kind()
            ))),
        }
    }

    fn is_numeric(&self) -> bool {
        !matches!(self, SortKey::Str(_))
    }

    fn to_float(&mut self) {
        if let SortKey::Int(n) = *self {
            *self = SortKey::Float(n as f64);
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Int(_) => 0,
            SortKey::Float(_) => 1,
            SortKey::Str(_) => 2,
        }
    }

    /// Keys of one list share a variant once normalised; other pairs order
    /// by variant so the comparison stays total.
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Float(a), SortKey::Float(b)) => a.total_cmp(b),
            (SortKey::Str(a), SortKey::Str(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl Operator for Sort {
    fn eval(&self, input: Value, _ctx: &EvalContext<'_>) -> EvalResult {
        let items = util::expect_list("sort", input)?;
        if let Some(field) = &self.field {
            util::check_field("sort", &items, field)?;
        }
        let mut keyed = Vec::with_capacity(items.len());
        for item in items {
            let key = match &self.field {
                Some(field) => SortKey::of(&util::read_field("sort", &item, field)?)?,
                None => SortKey::of(&item)?,
            };
            keyed.push((key, item));
        }
        if let Some((first, _)) = keyed.first() {
            let numeric = first.is_numeric();
            if keyed.iter().any(|(key, _)| key.is_numeric() != numeric) {
                return Err(EvalError::conversion(
                    "cannot order strings together with numbers",
                ));
            }
        }
        // A single float key puts the whole list on f64.
        if keyed.iter().any(|(key, _)| matches!(key, SortKey::Float(_))) {
            keyed.iter_mut().for_each(|(key, _)| key.to_float());
        }
        match self.direction {
            Direction::Asc => keyed.sort_by(|a, b| a.0.compare(&b.0)),
            Direction::Desc => keyed.sort_by(|a, b| b.0.compare(&a.0)),
        }
        Ok(Some(Value::List(
            keyed.into_iter().map(|(_, item)| item).collect(),
        )))
    }
}

fn build_map(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut ops = util::operator_args("map", args)?;
    match ops.pop() {
        Some(each) => Ok(Arc::new(Map { each })),
        None => Err(ParseError::invalid_arguments("map", "expects an operator")),
    }
}

fn build_filter(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut ops = util::operator_args("filter", args)?;
    match ops.pop() {
        Some(predicate) => Ok(Arc::new(Filter { predicate })),
        None => Err(ParseError::invalid_arguments("filter", "expects an operator")),
    }
}

fn build_select(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let literals = util::literal_args("select", args)?;
    let text = literals.first().map(String::as_str).unwrap_or_default();
    let index = text.parse::<usize>().map_err(|_| {
        ParseError::invalid_arguments("select", format!("index is not a number: {text:?}"))
    })?;
    Ok(Arc::new(Select { index }))
}

fn build_sort(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut literals = util::literal_args("sort", args)?.into_iter();
    let field = literals.next().filter(|field| field != "_");
    let direction = match literals.next().as_deref() {
        None | Some("asc") => Direction::Asc,
        Some("desc") => Direction::Desc,
        Some(other) => {
            return Err(ParseError::invalid_arguments(
                "sort",
                format!("unknown direction {other:?}, expected asc or desc"),
            ))
        }
    };
    Ok(Arc::new(Sort { field, direction }))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![
        Arc::new(OperatorDefinition {
            name: "map",
            arity: Arity::Fixed(1),
            build: build_map,
        }),
        Arc::new(OperatorDefinition {
            name: "filter",
            arity: Arity::Fixed(1),
            build: build_filter,
        }),
        Arc::new(OperatorDefinition {
            name: "select",
            arity: Arity::Fixed(1),
            build: build_select,
        }),
        Arc::new(OperatorDefinition {
            name: "sort",
            arity: Arity::Range(0, Some(2)),
            build: build_sort,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Value {
        Value::List(values.iter().copied().map(Value::Int32).collect())
    }

    fn sort(args: &[&str]) -> BoxedOperator {
        build_sort(args.iter().map(|a| Arg::Literal(a.to_string())).collect()).unwrap()
    }

    #[test]
    fn select_out_of_bounds() {
        let op = build_select(vec![Arg::Literal("2".into())]).unwrap();
        assert_eq!(
            op.eval(ints(&[1, 2]), &EvalContext::detached()),
            Err(EvalError::OutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(
            op.eval(ints(&[1, 2, 3]), &EvalContext::detached()),
            Ok(Some(Value::Int32(3)))
        );
    }

    #[test]
    fn select_rejects_negative_index() {
        let err = build_select(vec![Arg::Literal("-1".into())]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidArguments { .. }));
    }

    #[test]
    fn sort_directions() {
        let ctx = EvalContext::detached();
        assert_eq!(sort(&[]).eval(ints(&[3, 1, 2]), &ctx), Ok(Some(ints(&[1, 2, 3]))));
        assert_eq!(
            sort(&["_", "desc"]).eval(ints(&[3, 1, 2]), &ctx),
            Ok(Some(ints(&[3, 2, 1])))
        );
    }

    #[test]
    fn sort_mixed_numbers_and_strings() {
        let ctx = EvalContext::detached();
        let floats = Value::List(vec![Value::Float64(2.5), Value::Int32(1), Value::Float32(-1.0)]);
        assert_eq!(
            sort(&[]).eval(floats, &ctx),
            Ok(Some(Value::List(vec![
                Value::Float32(-1.0),
                Value::Int32(1),
                Value::Float64(2.5)
            ])))
        );
        let mixed = Value::List(vec![Value::from("a"), Value::Int32(1)]);
        assert!(matches!(sort(&[]).eval(mixed, &ctx), Err(EvalError::Conversion(_))));
    }

    #[test]
    fn sort_mixed_numbers_near_float_precision() {
        let big = 1i64 << 53;
        let mut items = Vec::new();
        for i in 0..40 {
            items.push(match i % 3 {
                0 => Value::Int64(big + 1),
                1 => Value::Float64(big as f64),
                _ => Value::Int64(big),
            });
        }
        let sorted = match sort(&[]).eval(Value::List(items.clone()), &EvalContext::detached()) {
            Ok(Some(Value::List(sorted))) => sorted,
            other => panic!("unexpected sort result: {other:?}"),
        };
        // Every key lands on the same f64, so the stable sort keeps input order.
        assert_eq!(sorted, items);

        let exact = Value::List(vec![Value::Int64(big + 1), Value::Int64(big)]);
        assert_eq!(
            sort(&[]).eval(exact, &EvalContext::detached()),
            Ok(Some(Value::List(vec![Value::Int64(big), Value::Int64(big + 1)])))
        );
    }

    #[test]
    fn sort_unorderable_kind() {
        let nested = Value::List(vec![ints(&[1]), ints(&[2])]);
        assert_eq!(
            sort(&[]).eval(nested, &EvalContext::detached()),
            Err(EvalError::conversion("don't know how to order type list"))
        );
    }

    #[test]
    fn sort_unknown_direction() {
        let err = build_sort(vec![Arg::Literal("_".into()), Arg::Literal("up".into())]);
        assert!(matches!(err, Err(ParseError::InvalidArguments { .. })));
    }
}
