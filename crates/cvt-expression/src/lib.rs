//! Pipeline expression engine.
//!
//! # Overview
//!
//! A pipeline expression is a small text language of composable operators,
//! such as `split(;)|map(split(:,int32)|obj(Reward))`. Expressions are parsed
//! into operator trees that take a [`Value`] and an [`EvalContext`] (the
//! source record plus the declared type of the field being computed) and
//! produce a value or nothing.
//!
//! # Example
//!
//! ```
//! use cvt_expression::{Pipeline, Value};
//!
//! let pipeline = Pipeline::compile_default("split(,)|map(int32)|sort(_,desc)").unwrap();
//! let result = pipeline.eval_detached(Value::from("2,7,1")).unwrap();
//!
//! assert_eq!(
//!     result,
//!     Some(Value::List(vec![Value::Int32(7), Value::Int32(2), Value::Int32(1)]))
//! );
//! ```

pub mod compile;
pub mod convert;
pub mod error;
pub mod eval_ctx;
pub mod operators;
pub mod parser;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod tokenizer;
pub mod types;
pub mod util;
pub mod value;

pub use compile::Pipeline;
pub use convert::{FromValue, IntoValue, Typed};
pub use error::{EvalError, ParseError};
pub use eval_ctx::EvalContext;
pub use parser::PipelineParser;
pub use record::{
    downcast_record, AsAny, DynamicRecord, EmptyRecord, FieldDef, Record, RecordType,
    RecordTypeRef, ValueType,
};
pub use registry::{default_registry, HostFn, Registry};
pub use resolve::resolve_record_type;
pub use types::{
    Arg, Arity, BoxedOperator, EvalResult, Operator, OperatorDefinition, OperatorFactory,
};
pub use value::{record_to_json, MapKey, Value, ValueKind, ValueMap};
