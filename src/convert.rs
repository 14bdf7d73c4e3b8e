use std::collections::HashMap;
use std::str::FromStr;

use derive_more::Display;
use phf::phf_map;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown category `{0}`")]
    UnknownCategory(String),

    #[error("Unknown unit `{0}` in category {1}")]
    UnknownUnit(String, Category),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Category {
    #[display(fmt = "Length")]
    Length,
    #[display(fmt = "Volume")]
    Volume,
    #[display(fmt = "Temperature")]
    Temperature,
    #[display(fmt = "Weight")]
    Weight,
    #[display(fmt = "Speed")]
    Speed,
    #[display(fmt = "Energy")]
    Energy,
    #[display(fmt = "Pressure")]
    Pressure,
    #[display(fmt = "Currency")]
    Currency,
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Length" => Ok(Category::Length),
            "Volume" => Ok(Category::Volume),
            "Temperature" => Ok(Category::Temperature),
            "Weight" => Ok(Category::Weight),
            "Speed" => Ok(Category::Speed),
            "Energy" => Ok(Category::Energy),
            "Pressure" => Ok(Category::Pressure),
            "Currency" => Ok(Category::Currency),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

// ratio of each unit to its category's pivot unit
static LENGTH: phf::Map<&'static str, f64> = phf_map! {
    "Meters" => 1.0,
    "Kilometers" => 1000.0,
    "Centimeters" => 0.01,
    "Millimeters" => 0.001,
    "Inches" => 0.0254,
    "Feet" => 0.3048,
};

static VOLUME: phf::Map<&'static str, f64> = phf_map! {
    "Liters" => 1.0,
    "Milliliters" => 0.001,
    "CubicMeters" => 1000.0,
    "Gallons" => 3.78541,
};

static WEIGHT: phf::Map<&'static str, f64> = phf_map! {
    "Kilograms" => 1.0,
    "Grams" => 0.001,
    "Pounds" => 0.453592,
    "Ounces" => 0.0283495,
};

static SPEED: phf::Map<&'static str, f64> = phf_map! {
    "KilometersPerHour" => 1.0,
    "MilesPerHour" => 1.60934,
    "MetersPerSecond" => 3.6,
};

static ENERGY: phf::Map<&'static str, f64> = phf_map! {
    "Joules" => 1.0,
    "Kilojoules" => 1000.0,
    "Calories" => 4.184,
};

static PRESSURE: phf::Map<&'static str, f64> = phf_map! {
    "Pascals" => 1.0,
    "Kilopascals" => 1000.0,
    "Atmospheres" => 101325.0,
    "Bars" => 100000.0,
};

pub const DEFAULT_CURRENCY_RATES: &[(&str, f64)] =
    &[("USD", 1.0), ("EUR", 0.85), ("UAH", 27.0), ("GBP", 0.75)];

/// Unit converter. Linear categories read static factor tables; currency
/// rates live on the instance so a refresh can replace the whole table.
#[derive(Debug, Clone)]
pub struct Converter {
    currency: HashMap<String, f64>,
}

impl Default for Converter {
    fn default() -> Self {
        let currency = DEFAULT_CURRENCY_RATES
            .iter()
            .map(|&(unit, rate)| (unit.to_string(), rate))
            .collect();
        Converter { currency }
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole currency table; no incremental merge.
    pub fn refresh_currency(&mut self, rates: HashMap<String, f64>) {
        self.currency = rates;
    }

    pub fn currency_units(&self) -> impl Iterator<Item = &str> {
        self.currency.keys().map(String::as_str)
    }

    pub fn convert(&self, category: &str, from: &str, to: &str, value: f64) -> Result<f64, Error> {
        let category = Category::from_str(category)?;
        match category {
            Category::Temperature => convert_temperature(from, to, value),
            Category::Currency => {
                let from_factor = self.currency_factor(from)?;
                let to_factor = self.currency_factor(to)?;
                Ok(value * from_factor / to_factor)
            }
            linear => {
                let table = factor_table(linear);
                let from_factor = factor(table, linear, from)?;
                let to_factor = factor(table, linear, to)?;
                Ok(value * from_factor / to_factor)
            }
        }
    }

    fn currency_factor(&self, unit: &str) -> Result<f64, Error> {
        self.currency
            .get(unit)
            .copied()
            .ok_or_else(|| Error::UnknownUnit(unit.to_string(), Category::Currency))
    }
}

fn factor_table(category: Category) -> &'static phf::Map<&'static str, f64> {
    match category {
        Category::Length => &LENGTH,
        Category::Volume => &VOLUME,
        Category::Weight => &WEIGHT,
        Category::Speed => &SPEED,
        Category::Energy => &ENERGY,
        Category::Pressure => &PRESSURE,
        // both handled before dispatching here
        Category::Temperature | Category::Currency => unreachable!(),
    }
}

fn factor(
    table: &'static phf::Map<&'static str, f64>,
    category: Category,
    unit: &str,
) -> Result<f64, Error> {
    table
        .get(unit)
        .copied()
        .ok_or_else(|| Error::UnknownUnit(unit.to_string(), category))
}

// temperature is affine, so it pivots through Celsius instead of a
// factor table
fn convert_temperature(from: &str, to: &str, value: f64) -> Result<f64, Error> {
    let celsius = match from {
        "Celsius" => value,
        "Fahrenheit" => (value - 32.0) * 5.0 / 9.0,
        "Kelvin" => value - 273.15,
        _ => return Err(Error::UnknownUnit(from.to_string(), Category::Temperature)),
    };
    match to {
        "Celsius" => Ok(celsius),
        "Fahrenheit" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "Kelvin" => Ok(celsius + 273.15),
        _ => Err(Error::UnknownUnit(to.to_string(), Category::Temperature)),
    }
}
