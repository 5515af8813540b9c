use crate::{
    error::{EngineError, Stage},
    executor::group::GroupTable,
    query::QueryPlan,
};

/// Drop the records HAVING rejects.
///
/// Every record is evaluated before any is removed, so an evaluation fault
/// leaves the table untouched. Slot values are never modified.
pub(crate) fn apply_having(plan: &QueryPlan, table: &mut GroupTable) -> Result<(), EngineError> {
    let Some(having) = &plan.having else {
        return Ok(());
    };

    let verdicts = table
        .records()
        .iter()
        .map(|record| having.eval(record))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| EngineError::eval_failed(Stage::Having, err.into()))?;

    let mut verdicts = verdicts.into_iter();
    table.retain(|_| verdicts.next().unwrap_or(false));

    Ok(())
}
