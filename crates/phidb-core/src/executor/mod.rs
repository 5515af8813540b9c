//! Module: executor
//! Responsibility: the EMF passes over a compiled `QueryPlan`: group table
//! build, one aggregation pass per grouping variable, HAVING and projection.
//! Does not own: name resolution (`query`) or source buffering (`engine`).
//! Boundary: every pass consumes exactly one scan of the base relation.

mod aggregate;
mod group;
mod having;
mod projection;


use crate::{
    error::Stage,
    executor::group::GroupRecord,
    query::{SlotReader, SlotRef},
    source::Record,
    value::Value,
};
use std::borrow::Cow;

// re-exports
pub(crate) use aggregate::run_aggregation_pass;
pub(crate) use group::{GroupTable, build_group_table};
pub(crate) use having::apply_having;
pub(crate) use projection::project;

static NULL: Value = Value::Null;

///
/// PassStats
///
/// Work counters for one pass, reported to logs, metrics and `RunSummary`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PassStats {
    pub(crate) stage: Stage,
    pub(crate) rows_scanned: u64,
    pub(crate) predicate_evaluations: u64,
    pub(crate) qualified_pairs: u64,
}

impl PassStats {
    const fn new(stage: Stage) -> Self {
        Self {
            stage,
            rows_scanned: 0,
            predicate_evaluations: 0,
            qualified_pairs: 0,
        }
    }
}

///
/// ScanPair
///
/// Predicate context of an aggregation pass: the scanned row plus the
/// group record it is tested against.
///

struct ScanPair<'a> {
    row: &'a Record,
    group: &'a GroupRecord,
}

impl SlotReader for ScanPair<'_> {
    fn read(&self, slot: SlotRef) -> Cow<'_, Value> {
        match slot {
            SlotRef::Scan(slot) => Cow::Borrowed(self.row.value(slot)),
            other => self.group.read(other),
        }
    }
}

impl SlotReader for GroupRecord {
    // Scan slots only exist inside a pass; outside one they read as Null.
    fn read(&self, slot: SlotRef) -> Cow<'_, Value> {
        match slot {
            SlotRef::Scan(_) => Cow::Borrowed(&NULL),
            SlotRef::Group(slot) => Cow::Borrowed(self.key().value(slot)),
            SlotRef::Aggregate(slot) => self
                .slots()
                .get(slot)
                .map_or(Cow::Borrowed(&NULL), |acc| Cow::Owned(acc.value())),
        }
    }
}
