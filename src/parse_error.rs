use crate::span::Span;
use crate::token::Token;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unexpected character `{0}` at position {1}")]
    UnexpectedCharacter(char, Span),

    #[error("Unexpected token `{0}` at position {1}")]
    UnexpectedToken(Token, Span),

    #[error("Expected `{expected}` but found `{found}` at position {span}")]
    ExpectedToken {
        expected: Token,
        found: Token,
        span: Span,
    },

    #[error("Unable to parse to number at position {0}")]
    ParseToNumber(Span),

    #[error("Unable to parse the next value")]
    Eof,

    #[error("Parse has leftover tokens starting with `{0}` at {1}")]
    Unfinished(Token, Span),
}
