//! Conversions between host field types and [`Value`].
//!
//! Numeric kinds convert among each other the way an `as` cast does; every
//! other mismatch is a conversion error.

use crate::error::EvalError;
use crate::record::{downcast_record, DynamicRecord, Record, RecordTypeRef, ValueType};
use crate::value::{MapKey, Value, ValueKind, ValueMap};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

/// Static [`ValueType`] of a host field type.
pub trait Typed {
    fn value_type() -> ValueType;
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, EvalError>;
}

fn cannot_convert(value: &Value, target: &str) -> EvalError {
    EvalError::conversion(format!("cannot convert {} to {target}", value.kind()))
}

macro_rules! numeric_conversions {
    ($($ty:ty => $variant:ident($stored:ty)),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn value_type() -> ValueType {
                    ValueType::Scalar(ValueKind::$variant)
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self as $stored)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, EvalError> {
                    match value {
                        Value::Int(n) => Ok(n as $ty),
                        Value::Int32(n) => Ok(n as $ty),
                        Value::Int64(n) => Ok(n as $ty),
                        Value::Float32(f) => Ok(f as $ty),
                        Value::Float64(f) => Ok(f as $ty),
                        other => Err(cannot_convert(&other, stringify!($ty))),
                    }
                }
            }
        )*
    };
}

numeric_conversions! {
    isize => Int(i64),
    i32 => Int32(i32),
    i64 => Int64(i64),
    f32 => Float32(f32),
    f64 => Float64(f64),
}

impl Typed for bool {
    fn value_type() -> ValueType {
        ValueType::Scalar(ValueKind::Bool)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(cannot_convert(&other, "bool")),
        }
    }
}

impl Typed for String {
    fn value_type() -> ValueType {
        ValueType::Scalar(ValueKind::Str)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(cannot_convert(&other, "string")),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        Ok(value)
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(cannot_convert(&other, "list")),
        }
    }
}

fn map_into_value<K, V>(entries: impl Iterator<Item = (K, V)>) -> Value
where
    K: Into<MapKey>,
    V: IntoValue,
{
    Value::Map(
        entries
            .map(|(k, v)| (k.into(), v.into_value()))
            .collect::<ValueMap>(),
    )
}

impl<K: Typed, V: Typed> Typed for HashMap<K, V> {
    fn value_type() -> ValueType {
        ValueType::Map(Box::new(K::value_type()), Box::new(V::value_type()))
    }
}

impl<K: Into<MapKey>, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        map_into_value(self.into_iter())
    }
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), EvalError> {
                    Ok((K::from_value(k.into_value())?, V::from_value(v)?))
                })
                .collect(),
            other => Err(cannot_convert(&other, "map")),
        }
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn value_type() -> ValueType {
        ValueType::Map(Box::new(K::value_type()), Box::new(V::value_type()))
    }
}

impl<K: Into<MapKey>, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        map_into_value(self.into_iter())
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), EvalError> {
                    Ok((K::from_value(k.into_value())?, V::from_value(v)?))
                })
                .collect(),
            other => Err(cannot_convert(&other, "map")),
        }
    }
}

impl<R: Record> Typed for Arc<R> {
    fn value_type() -> ValueType {
        ValueType::Ptr(Box::new(ValueType::Record(RecordTypeRef::of::<R>())))
    }
}

impl<R: Record> IntoValue for Arc<R> {
    fn into_value(self) -> Value {
        let record: Arc<dyn DynamicRecord> = self;
        Value::Record(record)
    }
}

impl<R: Record> FromValue for Arc<R> {
    fn from_value(value: Value) -> Result<Self, EvalError> {
        match value {
            Value::Record(record) => downcast_record(record),
            other => Err(cannot_convert(&other, R::static_record_type().name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_kinds_cast() {
        assert_eq!(i64::from_value(Value::Int32(50002)), Ok(50002));
        assert_eq!(i32::from_value(Value::Float64(11.9)), Ok(11));
        assert_eq!(f64::from_value(Value::Int(3)), Ok(3.0));
        assert!(i32::from_value(Value::Str("1".into())).is_err());
    }

    #[test]
    fn nested_maps() {
        let mut inner = HashMap::new();
        inner.insert(1i64, vec![1.5f64, 2.5]);
        let mut outer = HashMap::new();
        outer.insert("a".to_string(), inner);
        let value = outer.clone().into_value();
        assert_eq!(HashMap::<String, HashMap<i64, Vec<f64>>>::from_value(value), Ok(outer));
    }

    #[test]
    fn declared_types() {
        assert_eq!(
            <HashMap<i32, Vec<f32>>>::value_type().to_string(),
            "map[int32][]float32"
        );
    }
}
