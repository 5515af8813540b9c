use crate::{
    phi::{GroupingVar, PhiOperator},
    query::{
        expr::{Expr, ParseError},
        program::{PredicateProgram, ScalarProgram, SlotRef},
    },
    source::Schema,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Invalid syntax or unbound names in a predicate, HAVING or output column.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("reference '{found}.{name}' must use grouping variable {expected}")]
    ForeignGroupingVar {
        expected: GroupingVar,
        found: u32,
        name: String,
    },

    #[error("column '{0}' does not exist in the source")]
    UnknownColumn(String),

    #[error("name '{0}' is neither a grouping attribute nor a declared aggregate")]
    UnboundName(String),

    #[error("aggregate '{name}' belongs to grouping variable {owner} and is not computed yet")]
    AggregateNotYetComputed { name: String, owner: GroupingVar },

    #[error("qualified reference '{gv}.{name}' is only valid inside a predicate")]
    UnexpectedColumnRef { gv: u32, name: String },

    #[error("expected a boolean expression")]
    ExpectedBoolean,

    #[error("expected a value expression, found a boolean expression")]
    ExpectedScalar,

    #[error("aggregate '{aggregate}' reads column '{column}', which does not exist in the source")]
    UnknownAggregateSource { aggregate: String, column: String },

    #[error("grouping attribute '{0}' does not exist in the source")]
    UnknownGroupingColumn(String),
}

///
/// NameResolver
///
/// Scope that decides what a reference means for one consumer.
///

pub(super) trait NameResolver {
    fn column(&self, gv: u32, name: &str) -> Result<SlotRef, CompileError>;

    fn name(&self, name: &str) -> Result<SlotRef, CompileError>;
}

///
/// PredicateScope
///
/// Names visible to the predicate of one grouping variable: its own scan
/// row, the grouping attributes and aggregates finished by earlier passes.
///

pub(super) struct PredicateScope<'a> {
    pub(super) gv: GroupingVar,
    pub(super) schema: &'a Schema,
    pub(super) phi: &'a PhiOperator,
}

impl NameResolver for PredicateScope<'_> {
    fn column(&self, gv: u32, name: &str) -> Result<SlotRef, CompileError> {
        if gv != self.gv.get() {
            return Err(CompileError::ForeignGroupingVar {
                expected: self.gv,
                found: gv,
                name: name.to_string(),
            });
        }

        self.schema
            .slot(name)
            .map(SlotRef::Scan)
            .ok_or_else(|| CompileError::UnknownColumn(name.to_string()))
    }

    fn name(&self, name: &str) -> Result<SlotRef, CompileError> {
        if let Some(slot) = self.phi.grouping_attr_slot(name) {
            return Ok(SlotRef::Group(slot));
        }

        let Some(slot) = self.phi.aggregate_slot(name) else {
            return Err(CompileError::UnboundName(name.to_string()));
        };
        let owner = self.phi.aggregates()[slot].gv();
        if owner >= self.gv {
            return Err(CompileError::AggregateNotYetComputed {
                name: name.to_string(),
                owner,
            });
        }

        Ok(SlotRef::Aggregate(slot))
    }
}

///
/// AggregateScope
///
/// Names visible after every pass has finished: declared aggregates only.
///

pub(super) struct AggregateScope<'a> {
    pub(super) phi: &'a PhiOperator,
}

impl NameResolver for AggregateScope<'_> {
    fn column(&self, gv: u32, name: &str) -> Result<SlotRef, CompileError> {
        Err(CompileError::UnexpectedColumnRef {
            gv,
            name: name.to_string(),
        })
    }

    fn name(&self, name: &str) -> Result<SlotRef, CompileError> {
        self.phi
            .aggregate_slot(name)
            .map(SlotRef::Aggregate)
            .ok_or_else(|| CompileError::UnboundName(name.to_string()))
    }
}

/// Lower a parsed expression into a boolean program.
pub(super) fn lower_predicate(
    expr: &Expr,
    scope: &dyn NameResolver,
) -> Result<PredicateProgram, CompileError> {
    match expr {
        Expr::And(children) => children
            .iter()
            .map(|child| lower_predicate(child, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(PredicateProgram::And),
        Expr::Or(children) => children
            .iter()
            .map(|child| lower_predicate(child, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(PredicateProgram::Or),
        Expr::Not(inner) => Ok(PredicateProgram::Not(Box::new(lower_predicate(
            inner, scope,
        )?))),
        Expr::Compare { op, left, right } => Ok(PredicateProgram::Compare {
            op: *op,
            left: lower_scalar(left, scope)?,
            right: lower_scalar(right, scope)?,
        }),
        Expr::Literal(Value::Bool(true)) => Ok(PredicateProgram::True),
        Expr::Literal(Value::Bool(false) | Value::Null) => Ok(PredicateProgram::False),
        Expr::Literal(_) | Expr::Column { .. } | Expr::Name(_) | Expr::Neg(_) | Expr::Arith { .. } => {
            Err(CompileError::ExpectedBoolean)
        }
    }
}

/// Lower a parsed expression into a value program.
pub(super) fn lower_scalar(
    expr: &Expr,
    scope: &dyn NameResolver,
) -> Result<ScalarProgram, CompileError> {
    match expr {
        Expr::Literal(value) => Ok(ScalarProgram::Literal(value.clone())),
        Expr::Column { gv, name } => scope.column(*gv, name).map(ScalarProgram::Slot),
        Expr::Name(name) => scope.name(name).map(ScalarProgram::Slot),
        Expr::Neg(inner) => Ok(ScalarProgram::Neg(Box::new(lower_scalar(inner, scope)?))),
        Expr::Arith { op, left, right } => Ok(ScalarProgram::Arith {
            op: *op,
            left: Box::new(lower_scalar(left, scope)?),
            right: Box::new(lower_scalar(right, scope)?),
        }),
        Expr::Compare { .. } | Expr::And(_) | Expr::Or(_) | Expr::Not(_) => {
            Err(CompileError::ExpectedScalar)
        }
    }
}
