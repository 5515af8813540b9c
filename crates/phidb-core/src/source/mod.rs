//! Module: source
//! Responsibility: the row-source boundary consumed by the executor.
//! Does not own: connectivity to live stores or file discovery.
//! Boundary: schemas, records, in-memory relations and one-shot streams.

mod json;
mod relation;


use crate::value::Value;
use derive_more::{Deref, IntoIterator};
use std::collections::HashMap;
use thiserror::Error as ThisError;

// re-exports
pub use relation::{IterSource, Relation};

static NULL: Value = Value::Null;

///
/// SourceError
///
/// Failures raised while producing rows for a pass.
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected one JSON object per line")]
    NotAnObject { line: usize },

    #[error("line {line}: column '{column}' holds a nested value")]
    UnsupportedValue { line: usize, column: String },

    #[error("duplicate column '{0}' in source schema")]
    DuplicateColumn(String),

    #[error("record has {found} values but the schema has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },

    #[error("one-shot row source has already been consumed")]
    Exhausted,

    #[error("{0}")]
    Custom(String),
}

///
/// Schema
///
/// Ordered, duplicate-free column names of a row source.
/// Column position is the slot every compiled reference resolves to.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    slots: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from column names, rejecting duplicates.
    pub fn new<I, S>(columns: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for column in columns {
            let column = column.into();
            if schema.slot(&column).is_some() {
                return Err(SourceError::DuplicateColumn(column));
            }
            schema.push(column);
        }

        Ok(schema)
    }

    /// Resolve a column name to its slot.
    #[must_use]
    pub fn slot(&self, column: &str) -> Option<usize> {
        self.slots.get(column).copied()
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    // Append one column the caller has already checked for uniqueness.
    fn push(&mut self, column: String) -> usize {
        let slot = self.columns.len();
        self.slots.insert(column.clone(), slot);
        self.columns.push(column);

        slot
    }
}

///
/// Record
///
/// One source row; values are stored in schema slot order.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct Record(Vec<Value>);

impl Record {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Read one slot; slots past the end read as `Null`.
    #[must_use]
    pub fn value(&self, slot: usize) -> &Value {
        self.0.get(slot).unwrap_or(&NULL)
    }

    /// Reject records whose width disagrees with `schema`.
    pub fn check_arity(self, schema: &Schema) -> Result<Self, SourceError> {
        if self.0.len() != schema.len() {
            return Err(SourceError::ArityMismatch {
                expected: schema.len(),
                found: self.0.len(),
            });
        }

        Ok(self)
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Boxed row stream produced by one scan of a source.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<Record, SourceError>> + 'a>;

///
/// RowSource
///
/// Lazy, finite producer of records for the executor passes.
/// Sources that cannot restart from the beginning report
/// `supports_rescan() == false`; the engine buffers those once before
/// any pass begins.
///

pub trait RowSource {
    fn schema(&self) -> &Schema;

    fn supports_rescan(&self) -> bool;

    /// Start one scan from the first record.
    fn scan(&mut self) -> Result<RowStream<'_>, SourceError>;
}
