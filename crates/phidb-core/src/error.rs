//! Module: error
//! Responsibility: the run-level error taxonomy and the context each layer
//! error is reported with.
//! Does not own: layer-local error enums (`SpecError`, `CompileError`,
//! `SourceError`, `SinkError`), which live beside the code that raises them.

use crate::{
    phi::{GroupingVar, SpecError},
    query::CompileError,
    sink::SinkError,
    source::SourceError,
    value::{ArithmeticError, ValueFamily},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Stage
///
/// Execution step a runtime failure is reported against.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Buffer,
    Build,
    Aggregate(GroupingVar),
    Having,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer => f.write_str("source buffering"),
            Self::Build => f.write_str("group table build pass"),
            Self::Aggregate(gv) => write!(f, "aggregation pass for grouping variable {gv}"),
            Self::Having => f.write_str("HAVING filter"),
        }
    }
}

///
/// CompileContext
///
/// Which part of the operator failed to compile.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileContext {
    Grouping,
    Aggregate(String),
    Predicate(GroupingVar),
    Having,
}

impl fmt::Display for CompileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grouping => f.write_str("grouping attributes"),
            Self::Aggregate(name) => write!(f, "aggregate '{name}'"),
            Self::Predicate(gv) => write!(f, "predicate for grouping variable {gv}"),
            Self::Having => f.write_str("HAVING"),
        }
    }
}

///
/// EvalError
///
/// Runtime fault inside a pass or the HAVING filter.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("aggregate '{aggregate}' received a {family} value; expected a number")]
    NonNumericInput {
        aggregate: String,
        family: ValueFamily,
    },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

///
/// ProjectionError
///
/// Output column that cannot be resolved, or that fails while evaluating.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ProjectionError {
    #[error(transparent)]
    Unresolved(#[from] CompileError),

    #[error("division by zero")]
    DivisionByZero,

    #[error(transparent)]
    Arithmetic(ArithmeticError),
}

impl From<ArithmeticError> for ProjectionError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::DivisionByZero => Self::DivisionByZero,
            other => Self::Arithmetic(other),
        }
    }
}

///
/// EngineError
///
/// Any failure that aborts a run. No partial result is ever produced
/// alongside one of these.
///

#[derive(Debug, ThisError)]
pub enum EngineError {
    #[error("invalid specification: {0}")]
    Spec(#[from] SpecError),

    #[error("cannot compile {context}: {source}")]
    Compile {
        context: CompileContext,
        #[source]
        source: CompileError,
    },

    #[error("row source failed during {stage}: {source}")]
    Source {
        stage: Stage,
        #[source]
        source: SourceError,
    },

    #[error("evaluation failed during {stage}: {source}")]
    Eval {
        stage: Stage,
        #[source]
        source: EvalError,
    },

    #[error("output column '{column}': {source}")]
    Projection {
        column: String,
        #[source]
        source: ProjectionError,
    },

    #[error("number of distinct groups exceeds the limit of {limit}")]
    GroupLimitExceeded { limit: u64 },

    #[error("result sink failed: {0}")]
    Sink(#[from] SinkError),
}

impl EngineError {
    pub(crate) const fn compile_failed(context: CompileContext, source: CompileError) -> Self {
        Self::Compile { context, source }
    }

    pub(crate) const fn source_failed(stage: Stage, source: SourceError) -> Self {
        Self::Source { stage, source }
    }

    pub(crate) const fn eval_failed(stage: Stage, source: EvalError) -> Self {
        Self::Eval { stage, source }
    }
}
