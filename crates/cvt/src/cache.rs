//! Compiled pipelines per record type.

use crate::error::{Error, Result};
use cvt_expression::{FieldDef, Pipeline, RecordType, Registry};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// One annotated field together with its compiled pipeline.
#[derive(Debug, Clone)]
pub struct CompiledField {
    def: &'static FieldDef,
    pipeline: Pipeline,
}

impl CompiledField {
    pub fn def(&self) -> &'static FieldDef {
        self.def
    }

    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// The compiled pipelines of one record type, in field declaration order.
/// Fields without a pipeline are not listed.
#[derive(Debug)]
pub struct CompiledRecord {
    record_type: &'static RecordType,
    fields: Vec<CompiledField>,
}

impl CompiledRecord {
    /// Compiles every annotated field of `record_type`. The first failing
    /// field aborts the whole type.
    pub fn compile(record_type: &'static RecordType, registry: &Registry) -> Result<Self> {
        let mut fields = Vec::new();
        for def in record_type.fields() {
            let Some(expression) = def.pipeline() else {
                continue;
            };
            let pipeline = Pipeline::compile(expression, registry).map_err(|source| Error::Compile {
                record: record_type.name(),
                field: def.name(),
                source,
            })?;
            fields.push(CompiledField { def, pipeline });
        }
        Ok(CompiledRecord {
            record_type,
            fields,
        })
    }

    pub fn record_type(&self) -> &'static RecordType {
        self.record_type
    }

    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }
}

/// Lazily filled map from record type to its compiled pipelines.
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: RwLock<HashMap<TypeId, Arc<CompiledRecord>>>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached pipelines of `record_type`, compiling them on first
    /// use. Concurrent first uses compile once; a failed compile caches
    /// nothing.
    pub fn get_or_compile(
        &self,
        record_type: &'static RecordType,
        registry: &Registry,
    ) -> Result<Arc<CompiledRecord>> {
        let key = record_type.type_id();
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let mut entries = self.entries.write();
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let compiled = Arc::new(CompiledRecord::compile(record_type, registry)?);
        tracing::debug!(
            record = record_type.name(),
            fields = compiled.fields.len(),
            "compiled record pipelines"
        );
        entries.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn contains(&self, record_type: &RecordType) -> bool {
        self.entries.read().contains_key(&record_type.type_id())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
