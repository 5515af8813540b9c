use crate::{
    query::expr::{
        CompareOp, Expr, ParseError,
        lexer::{Token, TokenKind},
    },
    value::{ArithOp, Value},
};

///
/// Parser
///
/// Recursive-descent parser, lowest precedence first:
/// `or` → `and` → `not` → comparison → `+ -` → `* /` → unary `-` → primary.
/// Comparisons do not chain. Nesting depth is capped at `MAX_DEPTH`, which
/// also bounds the recursion of lowering and evaluation.
///

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Deepest expression tree the parser builds.
const MAX_DEPTH: usize = 256;

impl Parser {
    pub(super) const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub(super) fn parse_complete(mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let expr = self.parse_or()?;
        if let Some(token) = self.peek() {
            return Err(unexpected(token, "end of expression"));
        }

        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }

        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            return true;
        }

        false
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(unexpected(token, expected)),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    // Callers give the level back once the nested part is parsed.
    const fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }

        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_and()?];
        while self.eat(&TokenKind::Or) {
            children.push(self.parse_and()?);
        }

        Ok(collapse(children, Expr::Or))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_not()?];
        while self.eat(&TokenKind::And) {
            children.push(self.parse_not()?);
        }

        Ok(collapse(children, Expr::And))
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Not) {
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;

            return Ok(Expr::Not(Box::new(inner)));
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match self.peek_kind() {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Lte) => CompareOp::Lte,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Gte) => CompareOp::Gte,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_additive()?;

        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        let mut chain = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => ArithOp::Add,
                Some(TokenKind::Minus) => ArithOp::Sub,
                _ => break,
            };
            self.pos += 1;
            // Each link of a left-associative chain is one more tree level.
            self.descend()?;
            chain += 1;
            let right = self.parse_term()?;
            left = Expr::Arith {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth -= chain;

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        let mut chain = 0;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            chain += 1;
            let right = self.parse_unary()?;
            left = Expr::Arith {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth -= chain;

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Minus) {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;

            return Ok(Expr::Neg(Box::new(inner)));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        const EXPECTED: &str = "a value, reference or '('";

        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEnd { expected: EXPECTED });
        };

        match token.kind {
            TokenKind::Int(number) if self.peek_kind() == Some(&TokenKind::Dot) => {
                self.pos += 1;
                self.parse_column(number, token.position)
            }
            TokenKind::Int(v) => Ok(Expr::Literal(Value::Int(v))),
            TokenKind::Float(v) => Ok(Expr::Literal(Value::Float(v))),
            TokenKind::Str(v) => Ok(Expr::Literal(Value::Text(v))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Ident(name) => Ok(Expr::Name(name)),
            TokenKind::LeftParen => {
                self.descend()?;
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                self.depth -= 1;

                Ok(inner)
            }
            _ => Err(unexpected(&token, EXPECTED)),
        }
    }

    // `<gv>.<name>` after the dot has been consumed.
    fn parse_column(&mut self, gv: i64, position: usize) -> Result<Expr, ParseError> {
        let gv = u32::try_from(gv).map_err(|_| ParseError::InvalidNumber {
            text: gv.to_string(),
            position,
        })?;

        match self.advance() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(Expr::Column { gv, name }),
            Some(token) => Err(unexpected(&token, "an attribute name after '.'")),
            None => Err(ParseError::UnexpectedEnd {
                expected: "an attribute name after '.'",
            }),
        }
    }
}

// A single child is returned as-is rather than wrapped.
fn collapse(mut children: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if children.len() == 1 {
        return children.remove(0);
    }

    wrap(children)
}

fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind.to_string(),
        expected,
        position: token.position,
    }
}
