//! Dynamic values flowing between operators.

use crate::error::EvalError;
use crate::record::DynamicRecord;
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

/// Runtime tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Int32,
    Int64,
    Float32,
    Float64,
    Str,
    List,
    Map,
    Record,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Record => "record",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The hashable subset of values, usable as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Int32(i32),
    Int64(i64),
    Str(String),
}

impl MapKey {
    pub fn kind(&self) -> ValueKind {
        match self {
            MapKey::Bool(_) => ValueKind::Bool,
            MapKey::Int(_) => ValueKind::Int,
            MapKey::Int32(_) => ValueKind::Int32,
            MapKey::Int64(_) => ValueKind::Int64,
            MapKey::Str(_) => ValueKind::Str,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            MapKey::Bool(b) => Value::Bool(b),
            MapKey::Int(n) => Value::Int(n),
            MapKey::Int32(n) => Value::Int32(n),
            MapKey::Int64(n) => Value::Int64(n),
            MapKey::Str(s) => Value::Str(s),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::Int(n) | MapKey::Int64(n) => write!(f, "{n}"),
            MapKey::Int32(n) => write!(f, "{n}"),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

impl TryFrom<Value> for MapKey {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(b)),
            Value::Int(n) => Ok(MapKey::Int(n)),
            Value::Int32(n) => Ok(MapKey::Int32(n)),
            Value::Int64(n) => Ok(MapKey::Int64(n)),
            Value::Str(s) => Ok(MapKey::Str(s)),
            other => Err(EvalError::conversion(format!(
                "unsupported map key type {}",
                other.kind()
            ))),
        }
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Bool(b)
    }
}

impl From<isize> for MapKey {
    fn from(n: isize) -> Self {
        MapKey::Int(n as i64)
    }
}

impl From<i32> for MapKey {
    fn from(n: i32) -> Self {
        MapKey::Int32(n)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int64(n)
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Str(s)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

/// Insertion-ordered map produced by `dict` and `group`.
pub type ValueMap = IndexMap<MapKey, Value>;

/// A type-erased value. "No value" is expressed as `Option::None` by the
/// operators, never as a variant.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    /// Platform-sized integer, produced by `int`.
    Int(i64),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Str(String),
    List(Vec<Value>),
    Map(ValueMap),
    /// Shared handle to a record. Equality is identity.
    Record(Arc<dyn DynamicRecord>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrows the concrete record behind a `Record` handle.
    pub fn as_record<R: DynamicRecord>(&self) -> Option<&R> {
        match self {
            Value::Record(record) => (**record).as_any().downcast_ref::<R>(),
            _ => None,
        }
    }

    /// Whether the value equals the zero value of its kind. Records are
    /// never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Int(n) | Value::Int64(n) => *n == 0,
            Value::Int32(n) => *n == 0,
            Value::Float32(f) => *f == 0.0,
            Value::Float64(f) => *f == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Record(_) => false,
        }
    }

    /// Renders the value as JSON. Records become objects keyed by field name;
    /// non-finite floats become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) | Value::Int64(n) => Json::from(*n),
            Value::Int32(n) => Json::from(*n),
            Value::Float32(f) => float_to_json(f64::from(*f)),
            Value::Float64(f) => float_to_json(*f),
            Value::Str(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Value::Record(record) => record_to_json(&**record),
        }
    }
}

fn float_to_json(f: f64) -> Json {
    serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number)
}

/// Renders every declared field of a record as a JSON object.
pub fn record_to_json(record: &dyn DynamicRecord) -> Json {
    let mut object = serde_json::Map::new();
    for field in record.record_type().fields() {
        if let Some(value) = record.get_field(field.name()) {
            object.insert(field.name().to_string(), value.to_json());
        }
    }
    Json::Object(object)
}

impl TryFrom<Json> for Value {
    type Error = EvalError;

    /// Integral numbers become `Int64`, everything else numeric `Float64`.
    /// `null` has no representation.
    fn try_from(json: Json) -> Result<Self, Self::Error> {
        match json {
            Json::Null => Err(EvalError::conversion("null has no value representation")),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int64(i)),
                None => Ok(Value::Float64(n.as_f64().unwrap_or(f64::NAN))),
            },
            Json::String(s) => Ok(Value::Str(s)),
            Json::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Json::Object(object) => object
                .into_iter()
                .map(|(k, v)| -> Result<(MapKey, Value), EvalError> {
                    Ok((MapKey::Str(k), Value::try_from(v)?))
                })
                .collect::<Result<ValueMap, EvalError>>()
                .map(Value::Map),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int32(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int64(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_values() {
        assert!(Value::Bool(false).is_zero());
        assert!(Value::Int32(0).is_zero());
        assert!(Value::Float64(0.0).is_zero());
        assert!(Value::Str(String::new()).is_zero());
        assert!(Value::List(vec![]).is_zero());
        assert!(!Value::Str("0".into()).is_zero());
        assert!(!Value::Int64(-1).is_zero());
    }

    #[test]
    fn json_interop() {
        let value = Value::try_from(json!({"k1": [1, 2.5, "x", true]})).unwrap();
        assert_eq!(value.to_json(), json!({"k1": [1, 2.5, "x", true]}));
        assert!(Value::try_from(json!(null)).is_err());
    }

    #[test]
    fn float_keys_are_rejected() {
        let err = MapKey::try_from(Value::Float64(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "unsupported map key type float64");
    }
}
