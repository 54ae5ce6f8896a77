/// Declares a record struct and implements [`DynamicRecord`](crate::DynamicRecord)
/// and [`Record`](crate::Record) for it.
///
/// Each field is written as `"Name" => vis ident: Type` with an optional
/// `= "pipeline"`. `"Name"` is the name pipelines use to refer to the field,
/// and the struct name is the name `obj` resolves. Field types must implement
/// `Clone`, `Default`, [`Typed`](crate::Typed), [`IntoValue`](crate::IntoValue)
/// and [`FromValue`](crate::FromValue).
///
/// ```
/// cvt::record! {
///     pub struct Data {
///         "Kvs" => pub kvs: String,
///         "Kv" => pub kv: std::collections::HashMap<String, f64> =
///             "from(Kvs)|split(;)|map(split(:))|dict(select(0),select(1)|float64)",
///     }
/// }
///
/// let mut data = Data { kvs: "k1:11;k2:22".to_string(), ..Data::default() };
/// cvt::construct(&mut data).unwrap();
/// assert_eq!(data.kv["k2"], 22.0);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $fname:literal => $fvis:vis $field:ident : $ty:ty $(= $pipeline:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name {
            $($fvis $field: $ty,)*
        }

        impl $crate::DynamicRecord for $name {
            fn record_type(&self) -> &'static $crate::RecordType {
                <Self as $crate::Record>::static_record_type()
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $(
                        $fname => ::std::option::Option::Some($crate::IntoValue::into_value(
                            ::std::clone::Clone::clone(&self.$field),
                        )),
                    )*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> ::std::result::Result<(), $crate::EvalError> {
                match name {
                    $(
                        $fname => {
                            self.$field = <$ty as $crate::FromValue>::from_value(value)?;
                        }
                    )*
                    _ => {
                        return ::std::result::Result::Err($crate::EvalError::field_not_found(
                            ::std::stringify!($name),
                            name,
                        ))
                    }
                }
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::Record for $name {
            fn static_record_type() -> &'static $crate::RecordType {
                static RECORD_TYPE: ::std::sync::OnceLock<$crate::RecordType> =
                    ::std::sync::OnceLock::new();
                RECORD_TYPE.get_or_init(|| {
                    $crate::RecordType::new::<$name>(
                        ::std::stringify!($name),
                        ::std::vec![
                            $(
                                $crate::FieldDef::new(
                                    $fname,
                                    <$ty as $crate::Typed>::value_type(),
                                )
                                $(.with_pipeline($pipeline))?,
                            )*
                        ],
                    )
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{DynamicRecord, EvalError, Record, Value, ValueType};

    crate::record! {
        /// A row with one derived field.
        struct Sample {
            "Raw" => raw: String,
            "Parts" => parts: Vec<i64> = "from(Raw)|split(-,int64)",
        }
    }

    #[test]
    fn descriptor() {
        let ty = Sample::static_record_type();
        assert_eq!(ty.name(), "Sample");
        let names: Vec<&str> = ty.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Raw", "Parts"]);
        assert_eq!(ty.fields()[0].pipeline(), None);
        assert_eq!(ty.fields()[1].pipeline(), Some("from(Raw)|split(-,int64)"));
        assert_eq!(ty.fields()[1].ty().to_string(), "[]int64");
        assert!(matches!(ty.fields()[0].ty(), ValueType::Scalar(_)));
    }

    #[test]
    fn field_access() {
        let mut sample = Sample::default();
        sample.set_field("Raw", Value::from("1-2")).unwrap();
        assert_eq!(sample.raw, "1-2");
        assert_eq!(sample.get_field("Raw"), Some(Value::from("1-2")));
        assert_eq!(sample.get_field("raw"), None);
        assert_eq!(
            sample.set_field("Nope", Value::Bool(true)),
            Err(EvalError::field_not_found("Sample", "Nope"))
        );
        assert!(sample.set_field("Parts", Value::from("x")).is_err());
        assert!(sample.parts.is_empty());
    }

    #[test]
    fn instantiate_default() {
        let record = Sample::static_record_type().instantiate();
        assert_eq!(record.get_field("Parts"), Some(Value::List(vec![])));
    }
}
