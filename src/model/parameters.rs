//! Read and validate the parameters of an analysis from `model.toml`.
//!
//! This module defines [`ModelParameters`], which holds the scenario selection, priority weight
//! and the baseline [`EconomicParameters`] for one analysis. Each economic parameter is checked
//! against its valid domain and rejected (never clamped) if it lies outside it.
use crate::appraisal::priority::PriorityWeight;
use crate::error::ConfigurationError;
use crate::input::{input_err_msg, read_toml};
use crate::scenario::{ScenarioType, parse_scenario};
use anyhow::{Context, Result};
use log::warn;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_commodity_price, f64, 0.85);
define_param_default!(default_electricity_price, f64, 0.55);
define_param_default!(default_capital_cost_per_unit, f64, 1200.0);
define_param_default!(default_operating_fraction, f64, 0.05);
define_param_default!(default_carbon_price, f64, 45.0);
define_param_default!(default_discount_rate, f64, 0.08);
define_param_default!(default_lifetime_years, u32, 20);
define_param_default!(default_scenario, ScenarioType, ScenarioType::CurrentMarket);
define_param_default!(default_economic_weight, f64, 0.5);

/// Ranges of values considered typical for each economic parameter.
///
/// Values outside these ranges are valid but unusual, so they are reported with a warning.
static REFERENCE_RANGES: [(&str, RangeInclusive<f64>); 7] = [
    ("commodity_price", 0.1..=2.0),
    ("electricity_price", 0.1..=1.5),
    ("capital_cost_per_unit", 200.0..=5000.0),
    ("operating_fraction", 0.01..=0.2),
    ("carbon_price", 5.0..=200.0),
    ("discount_rate", 0.05..=0.15),
    ("lifetime_years", 10.0..=30.0),
];

/// Baseline economic parameters, before any scenario is applied.
///
/// These are immutable for the duration of one computation pass.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct EconomicParameters {
    /// Price received per unit of resource (e.g. BRL per m³ of biomethane)
    #[serde(default = "default_commodity_price")]
    pub commodity_price: f64,
    /// Price received per unit of energy (e.g. BRL per kWh)
    #[serde(default = "default_electricity_price")]
    pub electricity_price: f64,
    /// Capital cost per unit of daily resource capacity
    #[serde(default = "default_capital_cost_per_unit")]
    pub capital_cost_per_unit: f64,
    /// Annual operating cost as a fraction of capital cost
    #[serde(default = "default_operating_fraction")]
    pub operating_fraction: f64,
    /// Price received per tonne of CO2 avoided
    #[serde(default = "default_carbon_price")]
    pub carbon_price: f64,
    /// Annual discount rate, as a fraction
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
    /// Plant lifetime in years
    #[serde(default = "default_lifetime_years")]
    pub lifetime_years: u32,
}

impl Default for EconomicParameters {
    fn default() -> Self {
        Self {
            commodity_price: default_commodity_price(),
            electricity_price: default_electricity_price(),
            capital_cost_per_unit: default_capital_cost_per_unit(),
            operating_fraction: default_operating_fraction(),
            carbon_price: default_carbon_price(),
            discount_rate: default_discount_rate(),
            lifetime_years: default_lifetime_years(),
        }
    }
}

/// Check that a parameter is finite and strictly positive
fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name,
            value,
            constraint: "a finite number greater than zero",
        })
    }
}

/// Check the `discount_rate` parameter is valid
fn check_discount_rate(value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name: "discount_rate",
            value,
            constraint: "a finite number greater than or equal to zero",
        })
    }
}

/// Check the `lifetime_years` parameter is valid
fn check_lifetime_years(value: u32) -> Result<(), ConfigurationError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name: "lifetime_years",
            value: value.into(),
            constraint: "at least one year",
        })
    }
}

impl EconomicParameters {
    /// Check every parameter lies within its valid domain.
    ///
    /// Prices, costs and the operating fraction must be strictly positive, the discount rate must
    /// not be negative and the lifetime must be at least one year.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_positive("commodity_price", self.commodity_price)?;
        check_positive("electricity_price", self.electricity_price)?;
        check_positive("capital_cost_per_unit", self.capital_cost_per_unit)?;
        check_positive("operating_fraction", self.operating_fraction)?;
        check_positive("carbon_price", self.carbon_price)?;
        check_discount_rate(self.discount_rate)?;
        check_lifetime_years(self.lifetime_years)?;

        Ok(())
    }

    /// Iterate over parameter names and values
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("commodity_price", self.commodity_price),
            ("electricity_price", self.electricity_price),
            ("capital_cost_per_unit", self.capital_cost_per_unit),
            ("operating_fraction", self.operating_fraction),
            ("carbon_price", self.carbon_price),
            ("discount_rate", self.discount_rate),
            ("lifetime_years", self.lifetime_years.into()),
        ]
        .into_iter()
    }

    /// Names and values of the parameters which lie outside their typical ranges
    fn iter_unusual(&self) -> impl Iterator<Item = (&'static str, f64, &RangeInclusive<f64>)> {
        self.iter()
            .zip(REFERENCE_RANGES.iter())
            .filter(|((_, value), (_, range))| !range.contains(value))
            .map(|((name, value), (_, range))| (name, value, range))
    }

    /// Names of the parameters which lie outside their typical ranges
    pub fn outside_reference_ranges(&self) -> Vec<&'static str> {
        self.iter_unusual().map(|(name, _, _)| name).collect()
    }

    /// Emit a warning for each parameter outside its typical range
    pub fn warn_if_unusual(&self) {
        for (name, value, range) in self.iter_unusual() {
            warn!(
                "{name} = {value} lies outside the typical range [{}, {}]",
                range.start(),
                range.end()
            );
        }
    }
}

fn deserialize_scenario<'de, D>(deserializer: D) -> Result<ScenarioType, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_scenario(&s).map_err(D::Error::custom)
}

/// Analysis parameters as defined in the `model.toml` file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The market scenario to apply to the economic parameters
    #[serde(default = "default_scenario", deserialize_with = "deserialize_scenario")]
    pub scenario: ScenarioType,
    /// Weight of economic performance in the composite priority score (0 to 1)
    #[serde(default = "default_economic_weight")]
    pub economic_weight: f64,
    /// Region names used when regions are simulated rather than supplied.
    ///
    /// If empty, a built-in list is used.
    #[serde(default)]
    pub simulated_regions: Vec<String>,
    /// Baseline economic parameters
    #[serde(default)]
    pub economics: EconomicParameters,
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(model_params)
    }

    /// The economic weight as a validated [`PriorityWeight`]
    pub fn priority_weight(&self) -> Result<PriorityWeight, ConfigurationError> {
        PriorityWeight::new(self.economic_weight)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<(), ConfigurationError> {
        self.economics.validate()?;
        self.priority_weight()?;
        self.economics.warn_if_unusual();

        Ok(())
    }
}
