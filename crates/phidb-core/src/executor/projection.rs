use crate::{
    error::{EngineError, ProjectionError},
    executor::{
        aggregate::AccumulatorSlot,
        group::{GroupRecord, GroupTable},
    },
    query::{OutputColumn, QueryPlan},
    response::ResultSet,
    value::Value,
};

/// Resolve `S` for every surviving record, in table order.
///
/// All rows are evaluated before the result exists; one failing cell
/// fails the whole projection.
pub(crate) fn project(plan: &QueryPlan, table: &GroupTable) -> Result<ResultSet, EngineError> {
    let rows = table
        .records()
        .iter()
        .map(|record| project_record(plan, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultSet::new(plan.header.clone(), rows))
}

fn project_record(plan: &QueryPlan, record: &GroupRecord) -> Result<Vec<Value>, EngineError> {
    plan.projection
        .iter()
        .zip(&plan.header)
        .map(|(column, text)| {
            project_column(column, record).map_err(|source| EngineError::Projection {
                column: text.clone(),
                source,
            })
        })
        .collect()
}

fn project_column(column: &OutputColumn, record: &GroupRecord) -> Result<Value, ProjectionError> {
    match column {
        OutputColumn::GroupAttr(slot) => Ok(record.key().value(*slot).clone()),
        OutputColumn::Aggregate(slot) => Ok(record
            .slots()
            .get(*slot)
            .map_or(Value::Null, AccumulatorSlot::value)),
        OutputColumn::Expr(program) => Ok(program.eval(record)?.into_owned()),
    }
}
