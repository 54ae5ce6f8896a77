//! Index-building operators: `dict` and `group`.

use crate::error::{EvalError, ParseError};
use crate::eval_ctx::EvalContext;
use crate::types::{Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition};
use crate::util;
use crate::value::{MapKey, Value, ValueMap};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug)]
enum DictMode {
    /// Key each record element by one of its fields.
    ByField(String),
    /// Derive key and value from each element.
    ByOperators {
        key: BoxedOperator,
        value: BoxedOperator,
    },
}

/// Builds a map from a list. Later elements overwrite earlier ones that share
/// a key.
#[derive(Debug)]
pub struct Dict {
    mode: DictMode,
}

impl Operator for Dict {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let items = util::expect_list("dict", input)?;
        let mut out = ValueMap::with_capacity(items.len());
        match &self.mode {
            DictMode::ByField(field) => {
                util::check_field("dict", &items, field)?;
                for item in items {
                    let key = MapKey::try_from(util::read_field("dict", &item, field)?)?;
                    out.insert(key, item);
                }
            }
            DictMode::ByOperators { key, value } => {
                for item in items {
                    let k = util::require_present("dict", key.eval(item.clone(), ctx)?, &item)?;
                    let v = util::require_present("dict", value.eval(item.clone(), ctx)?, &item)?;
                    out.insert(MapKey::try_from(k)?, v);
                }
            }
        }
        Ok(Some(Value::Map(out)))
    }
}

/// Partitions record elements by a field. Groups keep element order and keys
/// keep first-appearance order. An optional reducer replaces each group with
/// its result; a group it reduces to nothing is dropped.
#[derive(Debug)]
pub struct Group {
    field: String,
    reduce: Option<BoxedOperator>,
}

impl Group {
    fn partition(&self, items: Vec<Value>) -> Result<Vec<(MapKey, Vec<Value>)>, EvalError> {
        util::check_field("group", &items, &self.field)?;
        let mut groups: IndexMap<MapKey, Vec<Value>> = IndexMap::new();
        for item in items {
            let key = MapKey::try_from(util::read_field("group", &item, &self.field)?)?;
            groups.entry(key).or_default().push(item);
        }
        Ok(groups.into_iter().collect())
    }
}

impl Operator for Group {
    fn eval(&self, input: Value, ctx: &EvalContext<'_>) -> EvalResult {
        let items = util::expect_list("group", input)?;
        let mut out = ValueMap::new();
        for (key, members) in self.partition(items)? {
            let members = Value::List(members);
            match &self.reduce {
                None => {
                    out.insert(key, members);
                }
                Some(reduce) => {
                    if let Some(reduced) = reduce.eval(members, ctx)? {
                        out.insert(key, reduced);
                    }
                }
            }
        }
        Ok(Some(Value::Map(out)))
    }
}

fn build_dict(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut args = args.into_iter();
    let mode = match (args.next(), args.next()) {
        (Some(field), None) => DictMode::ByField(util::literal_arg("dict", field)?),
        (Some(key), Some(value)) => DictMode::ByOperators {
            key: util::operator_arg("dict", key)?,
            value: util::operator_arg("dict", value)?,
        },
        _ => {
            return Err(ParseError::invalid_arguments(
                "dict",
                "expects a field name or a key and a value operator",
            ))
        }
    };
    Ok(Arc::new(Dict { mode }))
}

fn build_group(args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
    let mut args = args.into_iter();
    let field = match args.next() {
        Some(arg) => util::literal_arg("group", arg)?,
        None => return Err(ParseError::invalid_arguments("group", "expects a field name")),
    };
    let reduce = args
        .next()
        .map(|arg| util::operator_arg("group", arg))
        .transpose()?;
    Ok(Arc::new(Group { field, reduce }))
}

pub fn operators() -> Vec<Arc<OperatorDefinition>> {
    vec![
        Arc::new(OperatorDefinition {
            name: "dict",
            arity: Arity::Range(1, Some(2)),
            build: build_dict,
        }),
        Arc::new(OperatorDefinition {
            name: "group",
            arity: Arity::Range(1, Some(2)),
            build: build_group,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_by_field_needs_records() {
        let op = build_dict(vec![Arg::Literal("ID".into())]).unwrap();
        let err = op
            .eval(Value::List(vec![Value::Int32(1)]), &EvalContext::detached())
            .unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { .. }));
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let op = build_dict(vec![Arg::Literal("ID".into())]).unwrap();
        assert_eq!(
            op.eval(Value::List(vec![]), &EvalContext::detached()),
            Ok(Some(Value::Map(ValueMap::new())))
        );
        let op = build_group(vec![Arg::Literal("ID".into())]).unwrap();
        assert_eq!(
            op.eval(Value::List(vec![]), &EvalContext::detached()),
            Ok(Some(Value::Map(ValueMap::new())))
        );
    }

    #[test]
    fn dict_argument_kinds() {
        assert!(build_dict(vec![Arg::Literal("a".into()), Arg::Literal("b".into())]).is_err());
        let zero = crate::registry::Registry::with_builtins()
            .construct("zero", 0, Vec::new())
            .unwrap();
        assert!(build_dict(vec![Arg::Operator(zero)]).is_err());
    }
}
