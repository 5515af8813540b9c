use crate::{
    query::expr::CompareOp,
    value::{ArithOp, ArithmeticError, Value, apply_arith, compare_eq, compare_order, negate},
};
use std::{borrow::Cow, cmp::Ordering};

///
/// SlotRef
///
/// One compile-time resolved reference.
///
/// Scan      → source schema slot of the row being scanned
/// Group     → position in `V` of the current record's grouping key
/// Aggregate → position in `F` of the current record's accumulator
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SlotRef {
    Scan(usize),
    Group(usize),
    Aggregate(usize),
}

///
/// SlotReader
///
/// Row context a compiled program evaluates against.
///

pub(crate) trait SlotReader {
    fn read(&self, slot: SlotRef) -> Cow<'_, Value>;
}

///
/// ScalarProgram
///
/// Slot-resolved value expression.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ScalarProgram {
    Literal(Value),
    Slot(SlotRef),
    Neg(Box<Self>),
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
}

impl ScalarProgram {
    pub(crate) fn eval<'a, R>(&'a self, reader: &'a R) -> Result<Cow<'a, Value>, ArithmeticError>
    where
        R: SlotReader + ?Sized,
    {
        match self {
            Self::Literal(value) => Ok(Cow::Borrowed(value)),
            Self::Slot(slot) => Ok(reader.read(*slot)),
            Self::Neg(inner) => {
                let value = inner.eval(reader)?;
                negate(&value).map(Cow::Owned)
            }
            Self::Arith { op, left, right } => {
                let left = left.eval(reader)?;
                let right = right.eval(reader)?;
                apply_arith(*op, &left, &right).map(Cow::Owned)
            }
        }
    }
}

///
/// PredicateProgram
///
/// Slot-resolved boolean program.
/// Comparisons that involve `Null` or values of different families are
/// false; `not` negates that result.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PredicateProgram {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare {
        op: CompareOp,
        left: ScalarProgram,
        right: ScalarProgram,
    },
}

impl PredicateProgram {
    pub(crate) fn eval<R>(&self, reader: &R) -> Result<bool, ArithmeticError>
    where
        R: SlotReader + ?Sized,
    {
        match self {
            Self::True => Ok(true),
            Self::False => Ok(false),
            Self::And(children) => {
                for child in children {
                    if !child.eval(reader)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(children) => {
                for child in children {
                    if child.eval(reader)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(inner) => Ok(!inner.eval(reader)?),
            Self::Compare { op, left, right } => {
                let left = left.eval(reader)?;
                let right = right.eval(reader)?;

                Ok(eval_compare(*op, &left, &right))
            }
        }
    }

    #[must_use]
    pub(crate) const fn is_always_true(&self) -> bool {
        matches!(self, Self::True)
    }
}

fn eval_compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    match op {
        CompareOp::Eq => compare_eq(left, right) == Some(true),
        CompareOp::Ne => compare_eq(left, right) == Some(false),
        CompareOp::Lt => compare_order(left, right) == Some(Ordering::Less),
        CompareOp::Lte => compare_order(left, right).is_some_and(Ordering::is_le),
        CompareOp::Gt => compare_order(left, right) == Some(Ordering::Greater),
        CompareOp::Gte => compare_order(left, right).is_some_and(Ordering::is_ge),
    }
}
