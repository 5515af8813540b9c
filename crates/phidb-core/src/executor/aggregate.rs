use crate::{
    error::{EngineError, EvalError, Stage},
    executor::{NULL, PassStats, ScanPair, group::GroupTable},
    phi::{AggregateKind, GroupingVar},
    query::QueryPlan,
    source::{Record, SourceError},
    value::{ArithOp, Value, ValueFamily, apply_arith, compare_order},
};
use std::cmp::Ordering;

///
/// AccumulatorSlot
///
/// Running state of one aggregate for one group record.
///
/// Sum   → running total, integral until a float or overflow widens it
/// Count → qualifying rows, nulls included
/// Max   → greatest value seen; `None` exposes -inf
/// Min   → least value seen; `None` exposes +inf
/// Avg   → running float sum and count; zero count exposes 0.0
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AccumulatorSlot {
    Sum(Value),
    Count(u64),
    Max(Option<Value>),
    Min(Option<Value>),
    Avg { sum: f64, count: u64 },
}

impl AccumulatorSlot {
    #[must_use]
    pub(crate) const fn for_kind(kind: AggregateKind) -> Self {
        match kind {
            AggregateKind::Sum => Self::Sum(Value::Int(0)),
            AggregateKind::Count => Self::Count(0),
            AggregateKind::Max => Self::Max(None),
            AggregateKind::Min => Self::Min(None),
            AggregateKind::Avg => Self::Avg { sum: 0.0, count: 0 },
        }
    }

    /// Fold one qualifying input into the slot.
    ///
    /// `Null` is skipped by every kind except `Count`. Any other non-numeric
    /// input is rejected with its family.
    pub(crate) fn apply(&mut self, input: &Value) -> Result<(), ValueFamily> {
        if let Self::Count(total) = self {
            *total = total.saturating_add(1);
            return Ok(());
        }
        if input.is_null() {
            return Ok(());
        }
        if !input.is_numeric() {
            return Err(input.family());
        }

        match self {
            Self::Sum(total) => {
                *total = apply_arith(ArithOp::Add, total, input).map_err(|_| input.family())?;
            }
            Self::Max(current) => fold_extremum(current, input, Ordering::Greater),
            Self::Min(current) => fold_extremum(current, input, Ordering::Less),
            Self::Avg { sum, count } => {
                *sum += input.as_f64().unwrap_or_default();
                *count = count.saturating_add(1);
            }
            Self::Count(_) => {}
        }

        Ok(())
    }

    /// Exposed aggregate value.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn value(&self) -> Value {
        match self {
            Self::Sum(total) => total.clone(),
            Self::Count(total) => Value::Int(i64::try_from(*total).unwrap_or(i64::MAX)),
            Self::Max(current) => current.clone().unwrap_or(Value::Float(f64::NEG_INFINITY)),
            Self::Min(current) => current.clone().unwrap_or(Value::Float(f64::INFINITY)),
            Self::Avg { sum, count } => {
                if *count == 0 {
                    Value::Float(0.0)
                } else {
                    Value::Float(*sum / *count as f64)
                }
            }
        }
    }
}

// Keep the input when it orders as `keep` against the current extremum.
// Once either side is a float the slot stays float.
fn fold_extremum(current: &mut Option<Value>, input: &Value, keep: Ordering) {
    let next = match current.take() {
        None => input.clone(),
        Some(existing) => {
            let widen = matches!(existing, Value::Float(_)) || matches!(input, Value::Float(_));
            let winner = if compare_order(input, &existing) == Some(keep) {
                input.clone()
            } else {
                existing
            };

            if widen {
                winner.as_f64().map_or(winner, Value::Float)
            } else {
                winner
            }
        }
    };

    *current = Some(next);
}

/// Aggregation pass for `gv`.
///
/// Every scanned row is tested against every group record; a qualifying
/// pair updates the slots `gv` owns and nothing else.
pub(crate) fn run_aggregation_pass<I>(
    plan: &QueryPlan,
    gv: GroupingVar,
    table: &mut GroupTable,
    rows: I,
) -> Result<PassStats, EngineError>
where
    I: IntoIterator<Item = Result<Record, SourceError>>,
{
    let stage = Stage::Aggregate(gv);
    let predicate = plan.predicate(gv);
    let owned = plan.slots_owned_by(gv);
    let mut stats = PassStats::new(stage);

    for row in rows {
        let row = row.map_err(|err| EngineError::source_failed(stage, err))?;
        stats.rows_scanned += 1;

        for record in table.records_mut() {
            stats.predicate_evaluations += 1;
            let qualifies = predicate
                .eval(&ScanPair {
                    row: &row,
                    group: record,
                })
                .map_err(|err| EngineError::eval_failed(stage, err.into()))?;
            if !qualifies {
                continue;
            }
            stats.qualified_pairs += 1;

            for &slot in &owned {
                let aggregate = &plan.aggregates[slot];
                let input = aggregate.source.map_or(&NULL, |source| row.value(source));
                let Some(accumulator) = record.slot_mut(slot) else {
                    continue;
                };

                accumulator.apply(input).map_err(|family| {
                    EngineError::eval_failed(
                        stage,
                        EvalError::NonNumericInput {
                            aggregate: aggregate.name.clone(),
                            family,
                        },
                    )
                })?;
            }
        }
    }

    Ok(stats)
}
