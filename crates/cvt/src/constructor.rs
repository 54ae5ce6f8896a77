//! The driver: runs cached field pipelines against record instances.

use crate::cache::{CompiledRecord, PipelineCache};
use crate::error::{Error, Result};
use cvt_expression::{
    default_registry, Arg, BoxedOperator, DynamicRecord, EvalContext, EvalError, ParseError,
    Record, RecordType, Registry, Value,
};
use std::sync::{Arc, OnceLock};

/// Options for [`Constructor`].
#[derive(Debug, Clone)]
pub struct ConstructorOptions {
    /// Registry that pipeline names resolve against.
    pub registry: Arc<Registry>,
    /// Stop [`Constructor::apply_all`] at the first failing record instead of
    /// visiting them all.
    pub fail_fast: bool,
}

impl Default for ConstructorOptions {
    fn default() -> Self {
        ConstructorOptions {
            registry: Arc::clone(default_registry()),
            fail_fast: false,
        }
    }
}

/// Compiles field pipelines once per record type and applies them to
/// instances.
///
/// Pipelines are compiled against the registry as it is at the time of first
/// use; registering an operator later does not affect record types that are
/// already cached.
#[derive(Debug, Default)]
pub struct Constructor {
    options: ConstructorOptions,
    cache: PipelineCache,
}

impl Constructor {
    pub fn new(options: ConstructorOptions) -> Self {
        Constructor {
            options,
            cache: PipelineCache::new(),
        }
    }

    /// A constructor resolving names against `registry`.
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Constructor::new(ConstructorOptions {
            registry,
            ..ConstructorOptions::default()
        })
    }

    pub fn options(&self) -> &ConstructorOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.options.registry
    }

    pub fn cache(&self) -> &PipelineCache {
        &self.cache
    }

    /// The compiled pipelines of `record_type`, from the cache or freshly
    /// compiled.
    pub fn compile(&self, record_type: &'static RecordType) -> Result<Arc<CompiledRecord>> {
        self.cache.get_or_compile(record_type, &self.options.registry)
    }

    pub fn compile_type<R: Record>(&self) -> Result<Arc<CompiledRecord>> {
        self.compile(R::static_record_type())
    }

    /// Runs every field pipeline of `record` in declaration order.
    ///
    /// Each pipeline receives the field's current value. A result replaces the
    /// field; no result leaves it as it was. The first failure stops.
    pub fn apply(&self, record: &mut dyn DynamicRecord) -> Result<()> {
        let compiled = self.compile(record.record_type())?;
        apply_compiled(&compiled, record)
    }

    /// Applies the pipelines of `R` to every record. All records are visited
    /// unless `fail_fast` is set; the first error is returned.
    pub fn apply_all<R: Record>(&self, records: &mut [R]) -> Result<()> {
        let compiled = self.compile_type::<R>()?;
        let mut first_error = None;
        let mut failed = 0usize;
        for record in records.iter_mut() {
            if let Err(err) = apply_compiled(&compiled, record) {
                failed += 1;
                if first_error.is_none() {
                    first_error = Some(err);
                }
                if self.options.fail_fast {
                    break;
                }
            }
        }
        tracing::debug!(
            record = compiled.record_type().name(),
            count = records.len(),
            failed,
            "applied record pipelines"
        );
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Constructs every row, shares them as handles through `attach` (which
    /// stores them into `container`), then constructs `container` itself so
    /// its pipelines can index the rows.
    pub fn load_and_construct<C, R, F>(
        &self,
        container: &mut C,
        rows: Vec<R>,
        attach: F,
    ) -> Result<()>
    where
        C: Record,
        R: Record,
        F: FnOnce(&mut C, Vec<Arc<R>>),
    {
        let mut rows = rows;
        self.apply_all(&mut rows)?;
        attach(container, rows.into_iter().map(Arc::new).collect());
        self.apply(container)
    }
}

fn apply_compiled(compiled: &CompiledRecord, record: &mut dyn DynamicRecord) -> Result<()> {
    let record_name = compiled.record_type().name();
    for field in compiled.fields() {
        let name = field.name();
        let evaluate_error = |source: EvalError| Error::Evaluate {
            record: record_name,
            field: name,
            source,
        };
        let current = record
            .get_field(name)
            .ok_or_else(|| evaluate_error(EvalError::field_not_found(record_name, name)))?;
        let result = {
            let ctx = EvalContext::new(&*record, field.def().ty());
            field.pipeline().eval(current, &ctx)
        };
        match result.map_err(evaluate_error)? {
            Some(value) => {
                tracing::trace!(
                    record = record_name,
                    field = name,
                    kind = %value.kind(),
                    "set field"
                );
                record.set_field(name, value).map_err(evaluate_error)?;
            }
            None => tracing::trace!(record = record_name, field = name, "no value, field kept"),
        }
    }
    Ok(())
}

/// The process-wide constructor, backed by the default registry.
pub fn default_constructor() -> &'static Constructor {
    static CONSTRUCTOR: OnceLock<Constructor> = OnceLock::new();
    CONSTRUCTOR.get_or_init(Constructor::default)
}

/// Applies the pipelines of one record using the process-wide constructor.
pub fn construct(record: &mut dyn DynamicRecord) -> Result<()> {
    default_constructor().apply(record)
}

/// Applies the pipelines of every record using the process-wide constructor.
pub fn construct_all<R: Record>(records: &mut [R]) -> Result<()> {
    default_constructor().apply_all(records)
}

/// [`Constructor::load_and_construct`] on the process-wide constructor.
pub fn load_and_construct<C, R, F>(container: &mut C, rows: Vec<R>, attach: F) -> Result<()>
where
    C: Record,
    R: Record,
    F: FnOnce(&mut C, Vec<Arc<R>>),
{
    default_constructor().load_and_construct(container, rows, attach)
}

/// Registers an operator constructor on the process-wide registry.
pub fn register_operator<F>(name: impl Into<String>, factory: F)
where
    F: Fn(Vec<Arg>) -> std::result::Result<BoxedOperator, ParseError> + Send + Sync + 'static,
{
    default_registry().register_operator(name, factory);
}

/// Registers a host function on the process-wide registry.
pub fn register_host_function<F>(name: impl Into<String>, func: F)
where
    F: Fn(Value, &[String]) -> std::result::Result<Value, EvalError> + Send + Sync + 'static,
{
    default_registry().register_host_function(name, func);
}
