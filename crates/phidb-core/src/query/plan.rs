use crate::{
    error::{CompileContext, EngineError, ProjectionError},
    phi::{AggregateKind, GroupingVar, PhiOperator},
    query::{
        bind::{AggregateScope, CompileError, PredicateScope, lower_predicate, lower_scalar},
        expr::Expr,
        program::{PredicateProgram, ScalarProgram},
    },
    source::Schema,
};

/// Attribute placeholder that lets `count` run without reading a column.
const COUNT_ANY: &str = "*";

///
/// AggregatePlan
///
/// One `F` entry with its source column resolved to a schema slot.
/// `source` is `None` only for `count_<gv>_*`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct AggregatePlan {
    pub(crate) name: String,
    pub(crate) kind: AggregateKind,
    pub(crate) gv: GroupingVar,
    pub(crate) source: Option<usize>,
}

///
/// OutputColumn
///
/// Resolved `S` entry.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum OutputColumn {
    GroupAttr(usize),
    Aggregate(usize),
    Expr(ScalarProgram),
}

///
/// QueryPlan
///
/// Fully slot-resolved form of one `PhiOperator` against one schema.
/// Built before the first scan; immutable afterwards.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QueryPlan {
    pub(crate) grouping_slots: Vec<usize>,
    pub(crate) aggregates: Vec<AggregatePlan>,
    pub(crate) predicates: Vec<PredicateProgram>,
    pub(crate) having: Option<PredicateProgram>,
    pub(crate) projection: Vec<OutputColumn>,
    pub(crate) header: Vec<String>,
}

impl QueryPlan {
    /// Compile grouping, aggregates, predicates, HAVING and projection.
    ///
    /// Every name is resolved here, so an unbound reference fails the run
    /// before any row is read.
    pub(crate) fn compile(phi: &PhiOperator, schema: &Schema) -> Result<Self, EngineError> {
        let grouping_slots = phi
            .grouping_attrs()
            .iter()
            .map(|attr| {
                schema.slot(attr).ok_or_else(|| {
                    EngineError::compile_failed(
                        CompileContext::Grouping,
                        CompileError::UnknownGroupingColumn(attr.clone()),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let aggregates = phi
            .aggregates()
            .iter()
            .map(|aggregate| {
                let source = if aggregate.kind() == AggregateKind::Count
                    && aggregate.attribute() == COUNT_ANY
                {
                    None
                } else {
                    let slot = schema.slot(aggregate.attribute()).ok_or_else(|| {
                        EngineError::compile_failed(
                            CompileContext::Aggregate(aggregate.name().to_string()),
                            CompileError::UnknownAggregateSource {
                                aggregate: aggregate.name().to_string(),
                                column: aggregate.attribute().to_string(),
                            },
                        )
                    })?;
                    Some(slot)
                };

                Ok(AggregatePlan {
                    name: aggregate.name().to_string(),
                    kind: aggregate.kind(),
                    gv: aggregate.gv(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let predicates = phi
            .grouping_vars()
            .map(|gv| compile_predicate(phi, schema, gv))
            .collect::<Result<Vec<_>, _>>()?;

        let having = phi
            .having()
            .map(|text| {
                compile_having(phi, text)
                    .map_err(|err| EngineError::compile_failed(CompileContext::Having, err))
            })
            .transpose()?;

        let projection = phi
            .select()
            .iter()
            .map(|column| {
                compile_output_column(phi, column).map_err(|err| EngineError::Projection {
                    column: column.clone(),
                    source: err,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            grouping_slots,
            aggregates,
            predicates,
            having,
            projection,
            header: phi.select().to_vec(),
        })
    }

    /// Compiled predicate for `gv`.
    #[must_use]
    pub(crate) fn predicate(&self, gv: GroupingVar) -> &PredicateProgram {
        &self.predicates[gv.index()]
    }

    /// Positions in `F` of the slots owned by `gv`.
    pub(crate) fn slots_owned_by(&self, gv: GroupingVar) -> Vec<usize> {
        self.aggregates
            .iter()
            .enumerate()
            .filter(|(_, aggregate)| aggregate.gv == gv)
            .map(|(slot, _)| slot)
            .collect()
    }
}

fn compile_predicate(
    phi: &PhiOperator,
    schema: &Schema,
    gv: GroupingVar,
) -> Result<PredicateProgram, EngineError> {
    let Some(text) = phi.predicate(gv) else {
        return Ok(PredicateProgram::True);
    };

    let scope = PredicateScope { gv, schema, phi };
    Expr::parse(text)
        .map_err(CompileError::from)
        .and_then(|expr| lower_predicate(&expr, &scope))
        .map_err(|err| EngineError::compile_failed(CompileContext::Predicate(gv), err))
}

fn compile_having(phi: &PhiOperator, text: &str) -> Result<PredicateProgram, CompileError> {
    let expr = Expr::parse(text)?;

    lower_predicate(&expr, &AggregateScope { phi })
}

// Exact names win over parsing, so attributes that are not valid
// identifiers still project.
fn compile_output_column(phi: &PhiOperator, column: &str) -> Result<OutputColumn, ProjectionError> {
    if let Some(slot) = phi.grouping_attr_slot(column) {
        return Ok(OutputColumn::GroupAttr(slot));
    }
    if let Some(slot) = phi.aggregate_slot(column) {
        return Ok(OutputColumn::Aggregate(slot));
    }

    let expr = Expr::parse(column).map_err(CompileError::from)?;
    let program = lower_scalar(&expr, &AggregateScope { phi })?;

    Ok(OutputColumn::Expr(program))
}
