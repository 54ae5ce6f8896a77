//! Operator registry: name -> constructor.

use crate::error::{EvalError, ParseError};
use crate::operators::{self, host::HostFunctionFactory};
use crate::types::{Arg, BoxedOperator, OperatorDefinition, OperatorFactory};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Host callable adapted into an operator by [`Registry::register_host_function`].
pub type HostFn = dyn Fn(Value, &[String]) -> Result<Value, EvalError> + Send + Sync;

struct FnFactory<F>(F);

impl<F> OperatorFactory for FnFactory<F>
where
    F: Fn(Vec<Arg>) -> Result<BoxedOperator, ParseError> + Send + Sync,
{
    fn create(&self, args: Vec<Arg>) -> Result<BoxedOperator, ParseError> {
        (self.0)(args)
    }
}

/// Append-only map of operator constructors.
///
/// Lookups take a shared lock and registration takes the exclusive one, so
/// every lookup sees each registration that completed before it.
pub struct Registry {
    factories: RwLock<HashMap<String, Arc<dyn OperatorFactory>>>,
}

impl Registry {
    /// A registry with no operators at all.
    pub fn empty() -> Self {
        Registry {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding every built-in operator.
    pub fn with_builtins() -> Self {
        let registry = Registry::empty();
        for def in operators::all_operators() {
            registry.insert(def.name.to_string(), def);
        }
        registry
    }

    fn insert(&self, name: String, factory: Arc<dyn OperatorFactory>) {
        let previous = self.factories.write().insert(name.clone(), factory);
        if previous.is_some() {
            tracing::warn!(operator = %name, "replacing registered operator");
        }
    }

    /// Registers a built-in style definition under its own name.
    pub fn register_definition(&self, def: OperatorDefinition) {
        self.insert(def.name.to_string(), Arc::new(def));
    }

    /// Registers an operator constructor. Pipelines parsed afterwards resolve
    /// `name` to it; pipelines already compiled are unaffected.
    pub fn register_operator<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(Vec<Arg>) -> Result<BoxedOperator, ParseError> + Send + Sync + 'static,
    {
        self.insert(name.into(), Arc::new(FnFactory(factory)));
    }

    /// Adapts `func(value, literal_args)` into an operator taking any number of
    /// literal arguments.
    pub fn register_host_function<F>(&self, name: impl Into<String>, func: F)
    where
        F: Fn(Value, &[String]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory = HostFunctionFactory::new(name.clone(), Arc::new(func));
        self.insert(name, Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds the operator `name` from `args`. `pos` locates the name in the
    /// source expression for error reporting.
    pub fn construct(
        &self,
        name: &str,
        pos: usize,
        args: Vec<Arg>,
    ) -> Result<BoxedOperator, ParseError> {
        let factory = self.factories.read().get(name).cloned();
        match factory {
            Some(factory) => factory.create(args),
            None => Err(ParseError::UnknownOperator {
                name: name.to_string(),
                pos,
            }),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("operators", &self.names())
            .finish()
    }
}

/// The process-wide registry, created with the built-ins on first use.
pub fn default_registry() -> &'static Arc<Registry> {
    static REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(Registry::with_builtins()))
}
