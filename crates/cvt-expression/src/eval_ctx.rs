use crate::error::EvalError;
use crate::record::{DynamicRecord, EmptyRecord, ValueType};
use crate::value::Value;

/// The state passed to every operator: the record whose field is being
/// computed and that field's declared type.
///
/// Rebuilt for each field; never mutated during evaluation.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub record: &'a dyn DynamicRecord,
    pub field_type: &'a ValueType,
}

static DETACHED_RECORD: EmptyRecord = EmptyRecord;
static DETACHED_TYPE: ValueType = ValueType::Dynamic;

impl<'a> EvalContext<'a> {
    pub fn new(record: &'a dyn DynamicRecord, field_type: &'a ValueType) -> Self {
        EvalContext { record, field_type }
    }

    /// Reads a field of the source record.
    pub fn field(&self, name: &str) -> Result<Value, EvalError> {
        self.record
            .get_field(name)
            .ok_or_else(|| EvalError::field_not_found(self.record.record_type().name(), name))
    }
}

impl EvalContext<'static> {
    /// A context with no source fields and no declared type.
    pub fn detached() -> Self {
        EvalContext::new(&DETACHED_RECORD, &DETACHED_TYPE)
    }
}
