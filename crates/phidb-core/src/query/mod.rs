//! Module: query
//! Responsibility: compile a `PhiOperator` against a source schema into a
//! slot-resolved `QueryPlan`.
//! Does not own: row scanning, accumulator state or result rendering.
//! Boundary: every name is resolved here; the executor never looks names up.

mod bind;
pub mod expr;
mod plan;
mod program;


// re-exports
pub use bind::CompileError;
pub(crate) use plan::{OutputColumn, QueryPlan};
pub(crate) use program::{SlotReader, SlotRef};
