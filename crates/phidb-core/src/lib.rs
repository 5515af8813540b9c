//! Core runtime for PhiDB: the Phi operator model, its text parser, the
//! expression compiler, and the multi-pass EMF executor.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod engine;
pub mod error;
pub mod obs;
pub mod phi;
pub mod query;
pub mod response;
pub mod sink;
pub mod source;
pub mod value;

pub(crate) mod executor;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains the types needed to describe and run one EMF query.
/// Error types stay under `error` and the individual layers.
///

pub mod prelude {
    pub use crate::{
        config::EngineConfig,
        engine::{Engine, RunSummary},
        phi::{AggregateFn, AggregateKind, GroupingVar, PhiOperator},
        response::ResultSet,
        sink::{CollectSink, ResultSink},
        source::{IterSource, Record, Relation, RowSource, Schema},
        value::Value,
    };
}
