//! Module: sink
//! Responsibility: the result-sink boundary a completed run is handed to.
//! Does not own: output formatting; sinks decide how rows are laid out.

use thiserror::Error as ThisError;

///
/// SinkError
///

#[derive(Debug, ThisError)]
pub enum SinkError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

///
/// ResultSink
///
/// Consumer of a finished result. Called once per successful run and
/// never with a partial table.
///

pub trait ResultSink {
    fn write_result(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), SinkError>;
}

///
/// CollectSink
///
/// In-memory sink that keeps the most recent result.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CollectSink {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    writes: u32,
}

impl CollectSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of results received so far.
    #[must_use]
    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl ResultSink for CollectSink {
    fn write_result(&mut self, header: &[String], rows: &[Vec<String>]) -> Result<(), SinkError> {
        self.header = header.to_vec();
        self.rows = rows.to_vec();
        self.writes = self.writes.saturating_add(1);

        Ok(())
    }
}
