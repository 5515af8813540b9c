//! Metrics sink boundary.
//!
//! Engine logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

///
/// PassKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PassKind {
    Build,
    Aggregate { gv: u32 },
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    RunStart {
        grouping_vars: u32,
        aggregates: u32,
    },
    SourceBuffered {
        rows: u64,
    },
    PassFinish {
        kind: PassKind,
        rows_scanned: u64,
        predicate_evaluations: u64,
        qualified_pairs: u64,
    },
    GroupsBuilt {
        groups: u64,
    },
    HavingApplied {
        before: u64,
        after: u64,
    },
    RowsEmitted {
        rows: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}
