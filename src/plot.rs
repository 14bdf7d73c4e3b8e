use log::debug;

use crate::error::Error;
use crate::eval::{self, Environment};
use crate::{lex, parse};

pub const DEFAULT_SAMPLE_COUNT: usize = 1001;

/// Samples `expression` at `count` evenly spaced x values over
/// `[x_min, x_max]`. The expression is parsed once and the tree is
/// re-evaluated per sample. Fail-fast: the first evaluation error aborts
/// the whole plot, so callers never render a partial curve.
pub fn sample(
    expression: &str,
    x_min: f64,
    x_max: f64,
    count: usize,
) -> Result<Vec<(f64, f64)>, Error> {
    if x_min >= x_max {
        return Err(Error::InvalidRange(x_min, x_max));
    }
    if count < 2 {
        return Err(Error::TooFewSamples(count));
    }

    let items = lex::lex(expression)?;
    let expr = parse::parse(expression, &items)?;
    debug!("sampling {} over [{}, {}]", expr, x_min, x_max);

    let last = (count - 1) as f64;
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let x = x_min + (x_max - x_min) * i as f64 / last;
        let y = eval::evaluate(&expr, &Environment::with_x(x))?;
        points.push((x, y));
    }

    Ok(points)
}

pub fn sample_default(expression: &str, x_min: f64, x_max: f64) -> Result<Vec<(f64, f64)>, Error> {
    sample(expression, x_min, x_max, DEFAULT_SAMPLE_COUNT)
}
