//! Module: query::expr
//! Responsibility: shared expression syntax for predicates, HAVING and
//! projected columns.
//! Does not own: name resolution or evaluation; see `query::program`.

mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use crate::value::{ArithOp, Value};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at offset {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string literal starting at offset {position}")]
    UnterminatedString { position: usize },

    #[error("invalid numeric literal '{text}' at offset {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("unexpected {found} at offset {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        position: usize,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CompareOp {
    #[display("=")]
    Eq,
    #[display("<>")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
}

///
/// Expr
///
/// Untyped expression AST.
/// `Column` is a grouping-variable-qualified reference `<gv>.<name>`;
/// `Name` is a bare identifier whose meaning depends on the consumer.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Column {
        gv: u32,
        name: String,
    },
    Name(String),
    Neg(Box<Self>),
    Arith {
        op: ArithOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Compare {
        op: CompareOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
}

impl Expr {
    /// Parse one complete expression.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let tokens = lexer::tokenize(text)?;

        parser::Parser::new(tokens).parse_complete()
    }
}
