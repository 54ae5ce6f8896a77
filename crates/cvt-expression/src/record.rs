//! Dynamic record capability: field access by name plus a static descriptor
//! of each record type.

use crate::error::EvalError;
use crate::value::{Value, ValueKind};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Upcasts to `Any` so shared record handles can be turned back into their
/// concrete type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A record whose fields can be read and written by name.
///
/// `get_field` returns `None` only when the record has no field of that name.
pub trait DynamicRecord: AsAny + fmt::Debug {
    fn record_type(&self) -> &'static RecordType;
    fn get_field(&self, name: &str) -> Option<Value>;
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), EvalError>;
}

/// A concrete record type with a default instance and a static descriptor.
pub trait Record: DynamicRecord + Default + Sized {
    fn static_record_type() -> &'static RecordType;
}

/// Turns a shared record handle back into its concrete type.
pub fn downcast_record<R: Record>(record: Arc<dyn DynamicRecord>) -> Result<Arc<R>, EvalError> {
    let from = record.record_type().name();
    <dyn DynamicRecord as AsAny>::into_any_arc(record)
        .downcast::<R>()
        .map_err(|_| {
            EvalError::conversion(format!(
                "cannot convert record {from} to {}",
                R::static_record_type().name()
            ))
        })
}

/// Declared type of a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Scalar(ValueKind),
    List(Box<ValueType>),
    Map(Box<ValueType>, Box<ValueType>),
    /// Shared handle to the inner type.
    Ptr(Box<ValueType>),
    Record(RecordTypeRef),
    /// No declared type; used when evaluating outside of a record field.
    Dynamic,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(kind) => write!(f, "{kind}"),
            ValueType::List(elem) => write!(f, "[]{elem}"),
            ValueType::Map(key, value) => write!(f, "map[{key}]{value}"),
            ValueType::Ptr(elem) => write!(f, "*{elem}"),
            ValueType::Record(record) => f.write_str(record.get().name()),
            ValueType::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Lazily resolved reference to a record descriptor. Resolution is deferred
/// so that self-referencing record types can describe themselves.
#[derive(Clone, Copy)]
pub struct RecordTypeRef(fn() -> &'static RecordType);

impl RecordTypeRef {
    pub fn of<R: Record>() -> Self {
        RecordTypeRef(R::static_record_type)
    }

    pub fn get(&self) -> &'static RecordType {
        (self.0)()
    }
}

impl PartialEq for RecordTypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.get().type_id() == other.get().type_id()
    }
}

impl fmt::Debug for RecordTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordTypeRef({})", self.get().name())
    }
}

/// A declared field: the name pipelines refer to, its type and its optional
/// pipeline expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: &'static str,
    ty: ValueType,
    pipeline: Option<&'static str>,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: ValueType) -> Self {
        FieldDef {
            name,
            ty,
            pipeline: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: &'static str) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> &ValueType {
        &self.ty
    }

    pub fn pipeline(&self) -> Option<&'static str> {
        self.pipeline
    }
}

/// Static descriptor of a record type.
pub struct RecordType {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDef>,
    create: fn() -> Box<dyn DynamicRecord>,
}

fn create_default<R: Record>() -> Box<dyn DynamicRecord> {
    Box::new(R::default())
}

impl RecordType {
    pub fn new<R: Record>(name: &'static str, fields: Vec<FieldDef>) -> Self {
        RecordType {
            name,
            type_id: TypeId::of::<R>(),
            fields,
            create: create_default::<R>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A fresh default instance.
    pub fn instantiate(&self) -> Box<dyn DynamicRecord> {
        (self.create)()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// A record without fields, used as the source record when a pipeline runs
/// outside of any record.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRecord;

impl DynamicRecord for EmptyRecord {
    fn record_type(&self) -> &'static RecordType {
        EmptyRecord::static_record_type()
    }

    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, name: &str, _value: Value) -> Result<(), EvalError> {
        Err(EvalError::field_not_found("EmptyRecord", name))
    }
}

impl Record for EmptyRecord {
    fn static_record_type() -> &'static RecordType {
        static RECORD_TYPE: OnceLock<RecordType> = OnceLock::new();
        RECORD_TYPE.get_or_init(|| RecordType::new::<EmptyRecord>("EmptyRecord", Vec::new()))
    }
}
