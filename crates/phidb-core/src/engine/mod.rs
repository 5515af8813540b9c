//! Module: engine
//! Responsibility: sequence parse, compile, build pass, aggregation passes,
//! HAVING and projection for one run, and hand the result to a sink.
//! Does not own: pass internals (`executor`) or name resolution (`query`).
//! Boundary: the only public entrypoint that executes a `PhiOperator`.

#[cfg(test)]
mod property;

use crate::{
    config::EngineConfig,
    error::{EngineError, Stage},
    executor::{
        GroupTable, PassStats, apply_having, build_group_table, project, run_aggregation_pass,
    },
    obs::{MetricsEvent, MetricsSink, PassKind},
    phi::{PhiOperator, parse_phi},
    query::QueryPlan,
    response::ResultSet,
    sink::ResultSink,
    source::{Relation, RowSource, RowStream, Schema},
};
use log::{debug, info, warn};

///
/// PassSummary
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PassSummary {
    pub stage: Stage,
    pub rows_scanned: u64,
    pub qualified_pairs: u64,
}

///
/// RunSummary
///
/// What one successful run did: group counts around HAVING, rows emitted,
/// and the scan counters of every pass in execution order.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub groups_built: u64,
    pub groups_after_having: u64,
    pub rows_emitted: u64,
    pub buffered: bool,
    pub passes: Vec<PassSummary>,
}

///
/// ScanSource
///
/// The relation every pass scans: the caller's source when it can restart,
/// otherwise an in-memory copy taken once up front.
///

enum ScanSource<'s> {
    Direct(&'s mut dyn RowSource),
    Buffered(Relation),
}

impl ScanSource<'_> {
    fn scan(&mut self, stage: Stage) -> Result<RowStream<'_>, EngineError> {
        let rows = match self {
            Self::Direct(source) => source.scan(),
            Self::Buffered(relation) => relation.scan(),
        };

        rows.map_err(|err| EngineError::source_failed(stage, err))
    }
}

///
/// Engine
///
/// Executes validated Phi operators under one `EngineConfig`.
/// Runs are independent; the engine holds no state between them.
///

#[derive(Clone, Copy, Default)]
pub struct Engine<'m> {
    config: EngineConfig,
    metrics: Option<&'m dyn MetricsSink>,
}

impl<'m> Engine<'m> {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Report run events to `sink`.
    #[must_use]
    pub const fn with_metrics(mut self, sink: &'m dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Resolve every name in `phi` against `schema` without reading rows.
    pub fn validate(&self, phi: &PhiOperator, schema: &Schema) -> Result<(), EngineError> {
        QueryPlan::compile(phi, schema).map(|_| ())
    }

    /// Evaluate `phi` over `source` and return the projected result.
    pub fn execute(
        &self,
        phi: &PhiOperator,
        source: &mut dyn RowSource,
    ) -> Result<ResultSet, EngineError> {
        self.evaluate(phi, source).map(|(result, _)| result)
    }

    /// Evaluate `phi` and write the rendered result to `sink`.
    ///
    /// The sink is called only after every stage succeeded.
    pub fn run(
        &self,
        phi: &PhiOperator,
        source: &mut dyn RowSource,
        sink: &mut dyn ResultSink,
    ) -> Result<RunSummary, EngineError> {
        let (result, summary) = self.evaluate(phi, source)?;
        sink.write_result(result.header(), &result.rendered_rows())?;

        Ok(summary)
    }

    /// Parse specification text, then `run` it.
    pub fn run_text(
        &self,
        text: &str,
        source: &mut dyn RowSource,
        sink: &mut dyn ResultSink,
    ) -> Result<RunSummary, EngineError> {
        let phi = parse_phi(text)?;

        self.run(&phi, source, sink)
    }

    fn evaluate(
        &self,
        phi: &PhiOperator,
        source: &mut dyn RowSource,
    ) -> Result<(ResultSet, RunSummary), EngineError> {
        self.emit(MetricsEvent::RunStart {
            grouping_vars: phi.grouping_var_count(),
            aggregates: u32::try_from(phi.aggregates().len()).unwrap_or(u32::MAX),
        });

        // Everything is compiled before the first row is read.
        let plan = QueryPlan::compile(phi, source.schema())?;
        let mut summary = RunSummary::default();

        let mut scan_source = if source.supports_rescan() {
            ScanSource::Direct(source)
        } else {
            warn!(
                "row source cannot be rescanned; buffering it for {} passes",
                phi.grouping_var_count() + 1
            );
            let relation = Relation::buffer(source)
                .map_err(|err| EngineError::source_failed(Stage::Buffer, err))?;
            self.emit(MetricsEvent::SourceBuffered {
                rows: relation.len() as u64,
            });
            summary.buffered = true;

            ScanSource::Buffered(relation)
        };

        debug!("build pass: start");
        let (mut table, stats) = build_group_table(
            &plan,
            scan_source.scan(Stage::Build)?,
            self.config.max_groups(),
        )?;
        summary.groups_built = table.len() as u64;
        self.finish_pass(stats, &mut summary);
        self.emit(MetricsEvent::GroupsBuilt {
            groups: summary.groups_built,
        });

        for gv in phi.grouping_vars() {
            let stage = Stage::Aggregate(gv);
            debug!("{stage}: start over {} groups", table.len());

            let stats = run_aggregation_pass(&plan, gv, &mut table, scan_source.scan(stage)?)?;
            self.finish_pass(stats, &mut summary);
        }

        self.filter(&plan, &mut table, &mut summary)?;

        let result = project(&plan, &table)?;
        summary.rows_emitted = result.len() as u64;
        self.emit(MetricsEvent::RowsEmitted {
            rows: summary.rows_emitted,
        });

        info!(
            "emf run complete: n={}, groups={}, after_having={}, rows={}, buffered={}",
            phi.grouping_var_count(),
            summary.groups_built,
            summary.groups_after_having,
            summary.rows_emitted,
            summary.buffered,
        );

        Ok((result, summary))
    }

    fn filter(
        &self,
        plan: &QueryPlan,
        table: &mut GroupTable,
        summary: &mut RunSummary,
    ) -> Result<(), EngineError> {
        let before = table.len() as u64;
        apply_having(plan, table)?;
        summary.groups_after_having = table.len() as u64;

        if plan.having.is_some() {
            debug!(
                "HAVING kept {} of {before} groups",
                summary.groups_after_having
            );
            self.emit(MetricsEvent::HavingApplied {
                before,
                after: summary.groups_after_having,
            });
        }

        Ok(())
    }

    fn finish_pass(&self, stats: PassStats, summary: &mut RunSummary) {
        debug!(
            "{}: finish, rows_scanned={}, predicate_evaluations={}, qualified_pairs={}",
            stats.stage, stats.rows_scanned, stats.predicate_evaluations, stats.qualified_pairs,
        );

        let kind = match stats.stage {
            Stage::Aggregate(gv) => PassKind::Aggregate { gv: gv.get() },
            _ => PassKind::Build,
        };
        self.emit(MetricsEvent::PassFinish {
            kind,
            rows_scanned: stats.rows_scanned,
            predicate_evaluations: stats.predicate_evaluations,
            qualified_pairs: stats.qualified_pairs,
        });

        summary.passes.push(PassSummary {
            stage: stats.stage,
            rows_scanned: stats.rows_scanned,
            qualified_pairs: stats.qualified_pairs,
        });
    }

    fn emit(&self, event: MetricsEvent) {
        if let Some(sink) = self.metrics {
            sink.record(event);
        }
    }
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
