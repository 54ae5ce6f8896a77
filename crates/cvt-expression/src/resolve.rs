use crate::error::EvalError;
use crate::record::{RecordType, ValueType};

/// Finds the record type called `name` inside a declared field type, looking
/// through handles, list elements and map values.
pub fn resolve_record_type(name: &str, ty: &ValueType) -> Result<&'static RecordType, EvalError> {
    let mut current = ty;
    loop {
        match current {
            ValueType::Ptr(inner) | ValueType::List(inner) => current = &**inner,
            ValueType::Map(_, value) => current = &**value,
            ValueType::Record(record) => {
                let record_type = record.get();
                if record_type.name() == name {
                    return Ok(record_type);
                }
                break;
            }
            ValueType::Scalar(_) | ValueType::Dynamic => break,
        }
    }
    Err(EvalError::conversion(format!("type not found: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EmptyRecord, RecordTypeRef};
    use crate::value::ValueKind;

    #[test]
    fn looks_through_containers() {
        let record = ValueType::Ptr(Box::new(ValueType::Record(
            RecordTypeRef::of::<EmptyRecord>(),
        )));
        let ty = ValueType::Map(
            Box::new(ValueType::Scalar(ValueKind::Int32)),
            Box::new(ValueType::List(Box::new(record))),
        );
        let found = resolve_record_type("EmptyRecord", &ty).unwrap();
        assert_eq!(found.name(), "EmptyRecord");
    }

    #[test]
    fn name_must_match() {
        let ty = ValueType::Record(RecordTypeRef::of::<EmptyRecord>());
        assert_eq!(
            resolve_record_type("Reward", &ty).unwrap_err().to_string(),
            "type not found: Reward"
        );
        assert!(resolve_record_type("int32", &ValueType::Scalar(ValueKind::Int32)).is_err());
    }
}
