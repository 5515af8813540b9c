use crate::obs::sink::{MetricsEvent, MetricsSink, PassKind};
use serde::Serialize;
use std::cell::RefCell;

///
/// PassCounters
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PassCounters {
    pub passes: u64,
    pub rows_scanned: u64,
    pub predicate_evaluations: u64,
    pub qualified_pairs: u64,
}

///
/// EventReport
/// Accumulated counters over every run recorded by one `MetricsRecorder`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub runs: u64,
    pub rows_buffered: u64,
    pub build: PassCounters,
    pub aggregate: PassCounters,
    pub groups_built: u64,
    pub groups_filtered: u64,
    pub rows_emitted: u64,
}

///
/// MetricsRecorder
/// Process-local sink that folds events into an `EventReport`.
///

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    report: RefCell<EventReport>,
}

impl MetricsRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the counters gathered so far.
    #[must_use]
    pub fn report(&self) -> EventReport {
        self.report.borrow().clone()
    }

    pub fn reset(&self) {
        *self.report.borrow_mut() = EventReport::default();
    }
}

impl MetricsSink for MetricsRecorder {
    fn record(&self, event: MetricsEvent) {
        let mut report = self.report.borrow_mut();

        match event {
            MetricsEvent::RunStart { .. } => report.runs = report.runs.saturating_add(1),
            MetricsEvent::SourceBuffered { rows } => {
                report.rows_buffered = report.rows_buffered.saturating_add(rows);
            }
            MetricsEvent::PassFinish {
                kind,
                rows_scanned,
                predicate_evaluations,
                qualified_pairs,
            } => {
                let counters = match kind {
                    PassKind::Build => &mut report.build,
                    PassKind::Aggregate { .. } => &mut report.aggregate,
                };
                counters.passes = counters.passes.saturating_add(1);
                counters.rows_scanned = counters.rows_scanned.saturating_add(rows_scanned);
                counters.predicate_evaluations = counters
                    .predicate_evaluations
                    .saturating_add(predicate_evaluations);
                counters.qualified_pairs = counters.qualified_pairs.saturating_add(qualified_pairs);
            }
            MetricsEvent::GroupsBuilt { groups } => {
                report.groups_built = report.groups_built.saturating_add(groups);
            }
            MetricsEvent::HavingApplied { before, after } => {
                report.groups_filtered = report
                    .groups_filtered
                    .saturating_add(before.saturating_sub(after));
            }
            MetricsEvent::RowsEmitted { rows } => {
                report.rows_emitted = report.rows_emitted.saturating_add(rows);
            }
        }
    }
}
