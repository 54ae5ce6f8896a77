//! Built-in operator definitions, one module per family.

pub mod array;
pub mod container;
pub mod flow;
pub mod host;
pub mod input;
pub mod logical;
pub mod object;
pub mod string;
pub mod type_ops;

use crate::types::OperatorDefinition;
use std::sync::Arc;

/// Every built-in operator.
pub fn all_operators() -> Vec<Arc<OperatorDefinition>> {
    let mut ops = Vec::new();
    ops.extend(flow::operators());
    ops.extend(logical::operators());
    ops.extend(input::operators());
    ops.extend(string::operators());
    ops.extend(array::operators());
    ops.extend(container::operators());
    ops.extend(object::operators());
    ops.extend(type_ops::operators());
    ops
}
