//! Declarative record construction.
//!
//! # Overview
//!
//! Fields of a record can carry a pipeline expression describing how to
//! derive their value from other fields. The pipelines of a record type are
//! compiled once, cached, and replayed against every instance.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! cvt::record! {
//!     pub struct LevelReward {
//!         "MinLevel" => pub min_level: i32,
//!         "RewardId" => pub reward_id: i64,
//!     }
//! }
//!
//! cvt::record! {
//!     pub struct RewardCfg {
//!         "Reward2" => pub reward2: String,
//!         "Rewards" => pub rewards: Vec<Arc<LevelReward>> =
//!             "from(Reward2)|split(,)|map(split(:,int32)|obj(LevelReward,MinLevel,RewardId))|sort(MinLevel)",
//!     }
//! }
//!
//! let mut cfg = RewardCfg { reward2: "11:50002,1:50001".to_string(), ..Default::default() };
//! cvt::construct(&mut cfg).unwrap();
//!
//! assert_eq!(cfg.rewards[0].min_level, 1);
//! assert_eq!(cfg.rewards[1].reward_id, 50002);
//! ```

pub mod cache;
pub mod constructor;
pub mod error;
mod macros;

pub use cache::{CompiledField, CompiledRecord, PipelineCache};
pub use constructor::{
    construct, construct_all, default_constructor, load_and_construct, register_host_function,
    register_operator, Constructor, ConstructorOptions,
};
pub use error::{Error, Result};

pub use cvt_expression::{
    default_registry, downcast_record, record_to_json, resolve_record_type, Arg, Arity,
    BoxedOperator, DynamicRecord, EvalContext, EvalError, EvalResult, FieldDef, FromValue,
    IntoValue, MapKey, Operator, OperatorDefinition, OperatorFactory, ParseError, Pipeline, Record,
    RecordType, RecordTypeRef, Registry, Typed, Value, ValueKind, ValueMap, ValueType,
};
