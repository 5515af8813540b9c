use crate::value::{Value, ValueFamily};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ArithOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ArithOp {
    #[display("+")]
    Add,
    #[display("-")]
    Sub,
    #[display("*")]
    Mul,
    #[display("/")]
    Div,
}

///
/// ArithmeticError
///
/// Arithmetic faults raised while evaluating predicate operands, projection
/// expressions or numeric accumulators.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot apply '{op}' to {left} and {right} values")]
    NonNumeric {
        op: ArithOp,
        left: ValueFamily,
        right: ValueFamily,
    },

    #[error("cannot negate a {0} value")]
    NonNumericNegate(ValueFamily),
}

/// Apply one binary arithmetic operator.
///
/// Integer operands stay integral until they overflow, at which point the
/// result widens to `Float`. Division always yields `Float`. A `Null`
/// operand yields `Null`.
#[expect(clippy::cast_precision_loss)]
pub fn apply_arith(op: ArithOp, left: &Value, right: &Value) -> Result<Value, ArithmeticError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }

    if let (Value::Int(a), Value::Int(b)) = (left, right) {
        let checked = match op {
            ArithOp::Add => a.checked_add(*b),
            ArithOp::Sub => a.checked_sub(*b),
            ArithOp::Mul => a.checked_mul(*b),
            ArithOp::Div => {
                if *b == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                return Ok(Value::Float(*a as f64 / *b as f64));
            }
        };
        if let Some(result) = checked {
            return Ok(Value::Int(result));
        }
    }

    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(ArithmeticError::NonNumeric {
            op,
            left: left.family(),
            right: right.family(),
        });
    };

    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b == 0.0 {
                return Err(ArithmeticError::DivisionByZero);
            }
            a / b
        }
    };

    Ok(Value::Float(result))
}

/// Arithmetic negation; `Null` stays `Null`.
#[expect(clippy::cast_precision_loss)]
pub fn negate(value: &Value) -> Result<Value, ArithmeticError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(v) => Ok(v
            .checked_neg()
            .map_or_else(|| Value::Float(-(*v as f64)), Value::Int)),
        Value::Float(v) => Ok(Value::Float(-v)),
        other => Err(ArithmeticError::NonNumericNegate(other.family())),
    }
}
