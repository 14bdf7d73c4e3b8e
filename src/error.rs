use thiserror::Error;

use crate::parse_error::ParseError;
use crate::{convert, eval, history, settings};

/// Crate-level error. Every failure surfaces here as a structured value,
/// never as a panic; `kind` gives transport wrappers the stable taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] eval::Error),

    #[error(transparent)]
    Convert(#[from] convert::Error),

    #[error(transparent)]
    History(#[from] history::Error),

    #[error(transparent)]
    Settings(#[from] settings::Error),

    #[error("x min {0} must be less than x max {1}")]
    InvalidRange(f64, f64),

    #[error("Sample count {0} is too small to cover a range")]
    TooFewSamples(usize),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Parse(ParseError::UnexpectedCharacter(..)) => "LexError",
            Error::Parse(_) => "ParseError",
            Error::Eval(e) => match e {
                eval::Error::UnknownIdentifier(_) => "UnknownIdentifier",
                eval::Error::WrongNumberOfArguments(..) => "ArityError",
                eval::Error::DivideByZero => "DivisionByZero",
                eval::Error::SqrtOfNegative(_)
                | eval::Error::LogOfNonPositive(_)
                | eval::Error::NegativeBasePower(..)
                | eval::Error::UnrepresentableFraction(_) => "DomainError",
                eval::Error::UnknownOperation(_) => "ParseError",
            },
            Error::Convert(_) => "UnknownUnit",
            Error::History(_) | Error::Settings(_) => "IoError",
            Error::InvalidRange(..) | Error::TooFewSamples(_) => "RangeError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(evaluate("1/0").unwrap_err().kind(), "DivisionByZero");
        assert_eq!(evaluate("sqrt(-1)").unwrap_err().kind(), "DomainError");
        assert_eq!(evaluate("foo(1)").unwrap_err().kind(), "UnknownIdentifier");
        assert_eq!(evaluate("sin(1, 2)").unwrap_err().kind(), "ArityError");
        assert_eq!(evaluate("1 $ 2").unwrap_err().kind(), "LexError");
        assert_eq!(evaluate("1+").unwrap_err().kind(), "ParseError");
    }
}
