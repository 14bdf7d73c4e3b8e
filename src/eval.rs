use phf::phf_map;
use thiserror::Error;

use crate::ast::Expression;
use crate::token::Token;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("Function `{0}` accepts {1} argument(s) but received {2}")]
    WrongNumberOfArguments(String, usize, usize),

    #[error("Divide by 0")]
    DivideByZero,

    #[error("Square root of negative number {0}")]
    SqrtOfNegative(f64),

    #[error("Logarithm of non-positive number {0}")]
    LogOfNonPositive(f64),

    #[error("Negative base {0} raised to non-integer exponent {1}")]
    NegativeBasePower(f64, f64),

    #[error("Value {0} cannot be approximated as a fraction")]
    UnrepresentableFraction(f64),

    #[error("Unknown operator `{0}`")]
    UnknownOperation(Token),
}

/// Read-only evaluation context. Only `x` is ever bound; `pi` and `e`
/// resolve from the constant table when the name is not `x`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Environment {
    x: Option<f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(x: f64) -> Self {
        Environment { x: Some(x) }
    }

    fn lookup(&self, name: &str) -> Option<f64> {
        if name == "x" {
            return self.x;
        }
        CONSTANTS.get(name).copied()
    }
}

static CONSTANTS: phf::Map<&'static str, f64> = phf_map! {
    "pi" => std::f64::consts::PI,
    "e" => std::f64::consts::E,
};

#[derive(Debug, Clone, Copy)]
pub enum Native {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Ln,
    Log10,
    Abs,
    Pow,
}

static FUNCTIONS: phf::Map<&'static str, Native> = phf_map! {
    "sin" => Native::Sin,
    "cos" => Native::Cos,
    "tan" => Native::Tan,
    "sqrt" => Native::Sqrt,
    "log" => Native::Ln,
    "log10" => Native::Log10,
    "abs" => Native::Abs,
    "pow" => Native::Pow,
};

impl Native {
    pub fn arity(self) -> usize {
        match self {
            Native::Pow => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> Result<f64, Error> {
        match self {
            // trigonometric arguments are degrees
            Native::Sin => Ok(args[0].to_radians().sin()),
            Native::Cos => Ok(args[0].to_radians().cos()),
            Native::Tan => Ok(args[0].to_radians().tan()),
            Native::Sqrt => {
                if args[0] < 0.0 {
                    return Err(Error::SqrtOfNegative(args[0]));
                }
                Ok(args[0].sqrt())
            }
            Native::Ln => {
                if args[0] <= 0.0 {
                    return Err(Error::LogOfNonPositive(args[0]));
                }
                Ok(args[0].ln())
            }
            Native::Log10 => {
                if args[0] <= 0.0 {
                    return Err(Error::LogOfNonPositive(args[0]));
                }
                Ok(args[0].log10())
            }
            Native::Abs => Ok(args[0].abs()),
            Native::Pow => power(args[0], args[1]),
        }
    }
}

/// Pure tree interpreter: deterministic for identical (tree, environment)
/// pairs, no mutation, no I/O.
pub fn evaluate(expr: &Expression, env: &Environment) -> Result<f64, Error> {
    match expr {
        Expression::Number(v) => Ok(*v),
        Expression::Identifier(name) => env
            .lookup(name)
            .ok_or_else(|| Error::UnknownIdentifier(name.clone())),
        Expression::UnaryOp(operand, op) => {
            let v = evaluate(operand, env)?;
            match op {
                Token::Minus => Ok(-v),
                _ => Err(Error::UnknownOperation(*op)),
            }
        }
        Expression::BinaryOp(lhs, op, rhs) => {
            let l = evaluate(lhs, env)?;
            let r = evaluate(rhs, env)?;
            apply_binary(l, *op, r)
        }
        Expression::FnCall(name, args) => {
            let Some(native) = FUNCTIONS.get(name.as_str()).copied() else {
                return Err(Error::UnknownIdentifier(name.clone()));
            };
            if native.arity() != args.len() {
                return Err(Error::WrongNumberOfArguments(
                    name.clone(),
                    native.arity(),
                    args.len(),
                ));
            }
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, env)?);
            }
            native.apply(&values)
        }
    }
}

fn apply_binary(l: f64, op: Token, r: f64) -> Result<f64, Error> {
    match op {
        Token::Plus => Ok(l + r),
        Token::Minus => Ok(l - r),
        Token::Star => Ok(l * r),
        Token::Slash => {
            if r == 0.0 {
                return Err(Error::DivideByZero);
            }
            Ok(l / r)
        }
        // in-grammar `%` is binary remainder; the percent BUTTON is the
        // `percent` transform below
        Token::Percent => {
            if r == 0.0 {
                return Err(Error::DivideByZero);
            }
            Ok(l % r)
        }
        Token::Caret => power(l, r),
        _ => Err(Error::UnknownOperation(op)),
    }
}

fn power(base: f64, exp: f64) -> Result<f64, Error> {
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(Error::NegativeBasePower(base, exp));
    }
    Ok(base.powf(exp))
}

/// The `1/x` button: applied to an already evaluated result.
pub fn reciprocal(value: f64) -> Result<f64, Error> {
    if value == 0.0 {
        return Err(Error::DivideByZero);
    }
    Ok(1.0 / value)
}

/// The `%` button: divide the evaluated result by 100.
pub fn percent(value: f64) -> f64 {
    value / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lex, parse};

    fn eval_str(input: &str) -> Result<f64, Error> {
        let items = lex::lex(input).unwrap();
        let expr = parse::parse(input, &items).unwrap();
        evaluate(&expr, &Environment::new())
    }

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < 1e-9 * scale,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn basic_arithmetic() {
        assert_close(eval_str("2+3*4").unwrap(), 14.0);
        assert_close(eval_str("(2+3)*4").unwrap(), 20.0);
        assert_close(eval_str("10/4").unwrap(), 2.5);
        assert_close(eval_str("-3+5").unwrap(), 2.0);
    }

    #[test]
    fn exponent_tower_is_right_associative() {
        assert_close(eval_str("2^3^2").unwrap(), 512.0);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert!(matches!(eval_str("1/0"), Err(Error::DivideByZero)));
        assert!(matches!(eval_str("5%0"), Err(Error::DivideByZero)));
    }

    #[test]
    fn remainder_operator() {
        assert_close(eval_str("7%4").unwrap(), 3.0);
    }

    #[test]
    fn trigonometry_takes_degrees() {
        assert_close(eval_str("sin(90)").unwrap(), 1.0);
        assert_close(eval_str("cos(60)").unwrap(), 0.5);
        assert_close(eval_str("tan(45)").unwrap(), 1.0);
    }

    #[test]
    fn sqrt_of_negative_is_a_domain_error() {
        assert!(matches!(eval_str("sqrt(-1)"), Err(Error::SqrtOfNegative(_))));
    }

    #[test]
    fn log_is_natural_and_guards_its_domain() {
        assert_close(eval_str("log(e)").unwrap(), 1.0);
        assert_close(eval_str("log10(1000)").unwrap(), 3.0);
        assert!(matches!(eval_str("log(0)"), Err(Error::LogOfNonPositive(_))));
        assert!(matches!(
            eval_str("log10(-2)"),
            Err(Error::LogOfNonPositive(_))
        ));
    }

    #[test]
    fn negative_base_with_fractional_exponent_is_a_domain_error() {
        assert!(matches!(
            eval_str("(0-2)^0.5"),
            Err(Error::NegativeBasePower(..))
        ));
        assert_close(eval_str("(0-2)^3").unwrap(), -8.0);
    }

    #[test]
    fn pow_function_matches_caret() {
        assert_close(eval_str("pow(2, 10)").unwrap(), 1024.0);
        assert!(matches!(
            eval_str("pow(2, 10, 3)"),
            Err(Error::WrongNumberOfArguments(_, 2, 3))
        ));
    }

    #[test]
    fn unknown_function_name_is_reported() {
        assert!(matches!(
            eval_str("foo(1)"),
            Err(Error::UnknownIdentifier(name)) if name == "foo"
        ));
    }

    #[test]
    fn wrong_arity_on_known_function() {
        assert!(matches!(
            eval_str("sin(1, 2)"),
            Err(Error::WrongNumberOfArguments(_, 1, 2))
        ));
    }

    #[test]
    fn constants_resolve() {
        assert_close(eval_str("pi").unwrap(), std::f64::consts::PI);
        assert_close(eval_str("e").unwrap(), std::f64::consts::E);
    }

    #[test]
    fn x_must_be_bound() {
        assert!(matches!(
            eval_str("x+1"),
            Err(Error::UnknownIdentifier(name)) if name == "x"
        ));

        let items = lex::lex("x^2").unwrap();
        let expr = parse::parse("x^2", &items).unwrap();
        let v = evaluate(&expr, &Environment::with_x(3.0)).unwrap();
        assert_close(v, 9.0);
    }

    #[test]
    fn abs_and_unary_minus() {
        assert_close(eval_str("abs(0-7)").unwrap(), 7.0);
        assert_close(eval_str("-(2+3)").unwrap(), -5.0);
    }

    #[test]
    fn unary_minus_applies_after_the_exponent() {
        assert_close(eval_str("-2^2").unwrap(), -4.0);
        assert_close(eval_str("(-2)^2").unwrap(), 4.0);
        assert_close(eval_str("2^-1").unwrap(), 0.5);
    }

    #[test]
    fn reciprocal_transform() {
        assert_close(reciprocal(4.0).unwrap(), 0.25);
        assert!(matches!(reciprocal(0.0), Err(Error::DivideByZero)));
    }

    #[test]
    fn percent_transform() {
        assert_close(percent(50.0), 0.5);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let items = lex::lex("sin(30)+2^3").unwrap();
        let expr = parse::parse("sin(30)+2^3", &items).unwrap();
        let env = Environment::new();
        let a = evaluate(&expr, &env).unwrap();
        let b = evaluate(&expr, &env).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
