use crate::query::expr::ParseError;
use std::{fmt, iter::Peekable, str::CharIndices};

///
/// TokenKind
///

#[derive(Clone, Debug, PartialEq)]
pub(super) enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Dot,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Not,
    True,
    False,
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Int(v) => write!(f, "number {v}"),
            Self::Float(v) => write!(f, "number {v}"),
            Self::Str(v) => write!(f, "string '{v}'"),
            Self::Dot => f.write_str("'.'"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Eq => f.write_str("'='"),
            Self::Ne => f.write_str("'<>'"),
            Self::Lt => f.write_str("'<'"),
            Self::Lte => f.write_str("'<='"),
            Self::Gt => f.write_str("'>'"),
            Self::Gte => f.write_str("'>='"),
            Self::And => f.write_str("'and'"),
            Self::Or => f.write_str("'or'"),
            Self::Not => f.write_str("'not'"),
            Self::True => f.write_str("'true'"),
            Self::False => f.write_str("'false'"),
            Self::Null => f.write_str("'null'"),
        }
    }
}

///
/// Token
///

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) position: usize,
}

/// Split expression text into tokens.
///
/// A run of digits followed by `.` and a letter is a qualified reference
/// prefix (`1.state`), not a float; `1.5` stays a float.
pub(super) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => single(&mut chars, TokenKind::LeftParen),
            ')' => single(&mut chars, TokenKind::RightParen),
            '.' => single(&mut chars, TokenKind::Dot),
            '+' => single(&mut chars, TokenKind::Plus),
            '-' => single(&mut chars, TokenKind::Minus),
            '*' => single(&mut chars, TokenKind::Star),
            '/' => single(&mut chars, TokenKind::Slash),
            '=' => {
                chars.next();
                // `==` is accepted as an alias of `=`.
                chars.next_if(|&(_, c)| c == '=');
                TokenKind::Eq
            }
            '<' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Lte
                } else if chars.next_if(|&(_, c)| c == '>').is_some() {
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '=').is_none() {
                    return Err(ParseError::UnexpectedChar { ch, position });
                }
                TokenKind::Ne
            }
            '\'' | '"' => lex_string(&mut chars, ch, position)?,
            c if c.is_ascii_digit() => lex_number(text, &mut chars, position)?,
            c if c.is_alphabetic() || c == '_' => lex_word(&mut chars),
            _ => return Err(ParseError::UnexpectedChar { ch, position }),
        };

        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

fn single(chars: &mut Peekable<CharIndices<'_>>, kind: TokenKind) -> TokenKind {
    chars.next();
    kind
}

// Quoted literal; a doubled quote inside the literal stands for itself.
fn lex_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    position: usize,
) -> Result<TokenKind, ParseError> {
    chars.next();
    let mut literal = String::new();

    loop {
        match chars.next() {
            Some((_, c)) if c == quote => {
                if chars.next_if(|&(_, next)| next == quote).is_some() {
                    literal.push(quote);
                } else {
                    return Ok(TokenKind::Str(literal));
                }
            }
            Some((_, c)) => literal.push(c),
            None => return Err(ParseError::UnterminatedString { position }),
        }
    }
}

fn lex_number(
    text: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    position: usize,
) -> Result<TokenKind, ParseError> {
    let mut end = position;
    while let Some((index, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        end = index + c.len_utf8();
    }

    // Fractional part only when a digit follows the dot.
    let mut is_float = false;
    let rest = &text[end..];
    if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
        is_float = true;
        chars.next();
        end += 1;
        while let Some((index, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            end = index + c.len_utf8();
        }
    }

    let literal = &text[position..end];
    let invalid = || ParseError::InvalidNumber {
        text: literal.to_string(),
        position,
    };

    if is_float {
        literal.parse::<f64>().map(TokenKind::Float).map_err(|_| invalid())
    } else {
        literal.parse::<i64>().map(TokenKind::Int).map_err(|_| invalid())
    }
}

fn lex_word(chars: &mut Peekable<CharIndices<'_>>) -> TokenKind {
    let mut word = String::new();
    while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_') {
        word.push(c);
    }

    match word.to_ascii_lowercase().as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Ident(word),
    }
}
