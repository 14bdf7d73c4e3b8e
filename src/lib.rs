pub mod ast;
pub mod convert;
pub mod error;
pub mod eval;
pub mod fraction;
pub mod history;
pub mod lex;
pub mod parse;
pub mod parse_error;
pub mod plot;
pub mod session;
pub mod settings;
pub mod span;
pub mod token;

pub use error::Error;
pub use eval::Environment;

/// Full pipeline for one expression: lex, parse, evaluate.
pub fn evaluate_in(input: &str, env: &Environment) -> Result<f64, Error> {
    let items = lex::lex(input)?;
    let expr = parse::parse(input, &items)?;
    Ok(eval::evaluate(&expr, env)?)
}

pub fn evaluate(input: &str) -> Result<f64, Error> {
    evaluate_in(input, &Environment::new())
}

pub fn evaluate_with_x(input: &str, x: f64) -> Result<f64, Error> {
    evaluate_in(input, &Environment::with_x(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_evaluation() {
        let v = evaluate("sin(30)+2^3").unwrap();
        assert!((v - 8.5).abs() < 1e-9);
    }

    #[test]
    fn x_binding_flows_through() {
        assert_eq!(evaluate_with_x("x*x", 4.0).unwrap(), 16.0);
    }

    #[test]
    fn canonical_rendering_round_trips() {
        for input in ["2+3*4", "2^3^2", "-(1+2)/3", "pow(2, x)*sin(x)-pi"] {
            let items = lex::lex(input).unwrap();
            let expr = parse::parse(input, &items).unwrap();
            let rendered = expr.to_string();

            let items2 = lex::lex(&rendered).unwrap();
            let reparsed = parse::parse(&rendered, &items2).unwrap();

            let env = Environment::with_x(1.5);
            assert_eq!(
                eval::evaluate(&expr, &env).unwrap(),
                eval::evaluate(&reparsed, &env).unwrap(),
                "round trip changed the value of {input}"
            );
        }
    }
}
