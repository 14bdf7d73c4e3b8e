use derive_more::Display;

use crate::eval::Error;

/// Largest denominator the `frac` button will produce.
pub const MAX_DENOMINATOR: i64 = 10_000;

const TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "{}/{}", numerator, denominator)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

/// Nearest rational with denominator at most [`MAX_DENOMINATOR`], found by
/// walking the continued-fraction convergents of `value` until the
/// denominator cap is hit or the approximation is within tolerance.
pub fn approximate(value: f64) -> Result<Fraction, Error> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(Error::UnrepresentableFraction(value));
    }

    let target = value.abs();
    let tolerance = TOLERANCE * target.max(1.0);

    // convergents p/q via the standard recurrence, seeded with
    // p(-1)/q(-1) = 1/0 and p(-2)/q(-2) = 0/1
    let (mut p_prev, mut q_prev): (i64, i64) = (1, 0);
    let (mut p_prev2, mut q_prev2): (i64, i64) = (0, 1);
    let mut rest = target;

    for _ in 0..64 {
        let term = rest.floor() as i64;
        let Some(p) = term.checked_mul(p_prev).and_then(|v| v.checked_add(p_prev2)) else {
            break;
        };
        let Some(q) = term.checked_mul(q_prev).and_then(|v| v.checked_add(q_prev2)) else {
            break;
        };
        if q > MAX_DENOMINATOR {
            break;
        }

        (p_prev2, q_prev2) = (p_prev, q_prev);
        (p_prev, q_prev) = (p, q);

        let frac_part = rest - rest.floor();
        if frac_part < TOLERANCE || (p as f64 / q as f64 - target).abs() <= tolerance {
            break;
        }
        rest = 1.0 / frac_part;
    }

    let numerator = if value < 0.0 { -p_prev } else { p_prev };
    Ok(Fraction {
        numerator,
        denominator: q_prev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction {
            numerator: n,
            denominator: d,
        }
    }

    #[test]
    fn exact_halves_and_quarters() {
        assert_eq!(approximate(0.5).unwrap(), frac(1, 2));
        assert_eq!(approximate(2.75).unwrap(), frac(11, 4));
    }

    #[test]
    fn integers_have_denominator_one() {
        assert_eq!(approximate(42.0).unwrap(), frac(42, 1));
        assert_eq!(approximate(0.0).unwrap(), frac(0, 1));
    }

    #[test]
    fn negative_values_keep_the_sign_on_the_numerator() {
        assert_eq!(approximate(-0.25).unwrap(), frac(-1, 4));
    }

    #[test]
    fn repeating_decimal_recovers_the_simple_ratio() {
        assert_eq!(approximate(1.0 / 3.0).unwrap(), frac(1, 3));
        assert_eq!(approximate(0.1).unwrap(), frac(1, 10));
    }

    #[test]
    fn pi_stops_at_the_denominator_cap() {
        // the next convergent after 355/113 has denominator 33102
        assert_eq!(approximate(std::f64::consts::PI).unwrap(), frac(355, 113));
    }

    #[test]
    fn non_finite_input_is_a_domain_error() {
        assert!(matches!(
            approximate(f64::NAN),
            Err(Error::UnrepresentableFraction(_))
        ));
        assert!(matches!(
            approximate(f64::INFINITY),
            Err(Error::UnrepresentableFraction(_))
        ));
    }
}
