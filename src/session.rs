use log::debug;

use crate::error::Error;
use crate::eval::{self, Environment};
use crate::fraction::{self, Fraction};
use crate::history::History;
use crate::{lex, parse};

/// Scientific-calculator state: memory register, last result (Ans) and
/// the calculation history. Every completed operation is recorded the way
/// the button that triggered it reads.
pub struct Session {
    memory: f64,
    last_result: f64,
    history: History,
}

impl Session {
    pub fn new(history: History) -> Self {
        Session {
            memory: 0.0,
            last_result: 0.0,
            history,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn last_result(&self) -> f64 {
        self.last_result
    }

    fn eval_str(&self, input: &str) -> Result<f64, Error> {
        let items = lex::lex(input)?;
        let expr = parse::parse(input, &items)?;
        debug!("evaluating {}", expr);
        Ok(eval::evaluate(&expr, &Environment::new())?)
    }

    fn record(&mut self, label: &str, value: f64) -> Result<f64, Error> {
        self.history.append(label, &value.to_string())?;
        self.last_result = value;
        Ok(value)
    }

    /// The `=` button.
    pub fn evaluate(&mut self, input: &str) -> Result<f64, Error> {
        let value = self.eval_str(input)?;
        self.record(input, value)
    }

    /// Function buttons (`sin`, `cos`, `sqrt`, ...): wraps the current
    /// expression in a call and runs it through the same pipeline, so
    /// unknown names and arity mistakes surface as usual.
    pub fn apply_function(&mut self, name: &str, input: &str) -> Result<f64, Error> {
        let composed = format!("{}({})", name, input);
        let value = self.eval_str(&composed)?;
        self.record(&composed, value)
    }

    /// The `1/x` button.
    pub fn reciprocal(&mut self, input: &str) -> Result<f64, Error> {
        let value = eval::reciprocal(self.eval_str(input)?)?;
        self.record(&format!("1/({})", input), value)
    }

    /// The `%` button: a post-evaluation transform, not grammar.
    pub fn percent(&mut self, input: &str) -> Result<f64, Error> {
        let value = eval::percent(self.eval_str(input)?);
        self.record(&format!("percent({})", input), value)
    }

    /// The `frac` button.
    pub fn fraction(&mut self, input: &str) -> Result<Fraction, Error> {
        let value = self.eval_str(input)?;
        let frac = fraction::approximate(value)?;
        self.history
            .append(&format!("frac({})", input), &frac.to_string())?;
        Ok(frac)
    }

    pub fn memory_recall(&self) -> f64 {
        self.memory
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    pub fn memory_add(&mut self, input: &str) -> Result<f64, Error> {
        self.memory += self.eval_str(input)?;
        Ok(self.memory)
    }

    pub fn memory_subtract(&mut self, input: &str) -> Result<f64, Error> {
        self.memory -= self.eval_str(input)?;
        Ok(self.memory)
    }
}
