use std::fmt;

use winnow::ascii::digit1;
use winnow::combinator::alt;
use winnow::error::ModalResult;
use winnow::prelude::*;

use crate::types::{AtomId, CompileError};

/// One token of a normalized logic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Id(AtomId),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Id(id) => write!(f, "{id}"),
            Token::And => f.write_str("and"),
            Token::Or => f.write_str("or"),
            Token::Not => f.write_str("not"),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
        }
    }
}

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((
        digit1.try_map(str::parse::<AtomId>).map(Token::Id),
        "and".value(Token::And),
        "or".value(Token::Or),
        "not".value(Token::Not),
        '('.value(Token::Open),
        ')'.value(Token::Close),
    ))
    .parse_next(input)
}

/// Split a normalized expression on single spaces and classify every word.
///
/// # Errors
///
/// Returns [`CompileError::InvalidToken`] for the first word that is not a
/// non-negative integer, `and`, `or`, `not`, `(` or `)`.
pub(crate) fn tokenize(normalized: &str) -> Result<Vec<Token>, CompileError> {
    if normalized.is_empty() {
        return Ok(Vec::new());
    }
    normalized
        .split(' ')
        .map(|word| {
            token.parse(word).map_err(|_| CompileError::InvalidToken {
                token: word.to_owned(),
            })
        })
        .collect()
}
