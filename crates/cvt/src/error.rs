use cvt_expression::{EvalError, ParseError};
use thiserror::Error;

/// Failure of a driver entry point, naming the record type and field whose
/// pipeline failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("failed to compile {record}.{field}: {source}")]
    Compile {
        record: &'static str,
        field: &'static str,
        source: ParseError,
    },

    #[error("failed to construct {record}.{field}: {source}")]
    Evaluate {
        record: &'static str,
        field: &'static str,
        source: EvalError,
    },
}

impl Error {
    /// Name of the record type that failed.
    pub fn record(&self) -> &'static str {
        match self {
            Error::Compile { record, .. } | Error::Evaluate { record, .. } => record,
        }
    }

    /// Name of the field whose pipeline failed.
    pub fn field(&self) -> &'static str {
        match self {
            Error::Compile { field, .. } | Error::Evaluate { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
