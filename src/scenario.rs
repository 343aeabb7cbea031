//! Market scenarios, which adjust the baseline economic parameters by fixed multipliers.
use crate::error::ConfigurationError;
use crate::model::EconomicParameters;
use serde::{Serialize, Serializer};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::fmt;

/// A named market outlook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeLabeledStringEnum)]
pub enum ScenarioType {
    /// Prices and costs as they stand today
    #[string = "current-market"]
    CurrentMarket,
    /// Higher prices and cheaper plants
    #[string = "optimistic"]
    Optimistic,
    /// Lower prices and more expensive plants
    #[string = "conservative"]
    Conservative,
    /// A strong carbon market with modest green incentives
    #[string = "carbon-focused"]
    CarbonFocused,
    /// No adjustment: the caller sets the economic parameters directly
    #[string = "custom"]
    Custom,
}

impl ScenarioType {
    /// All scenarios, in display order
    pub const ALL: [ScenarioType; 5] = [
        ScenarioType::CurrentMarket,
        ScenarioType::Optimistic,
        ScenarioType::Conservative,
        ScenarioType::CarbonFocused,
        ScenarioType::Custom,
    ];

    /// The identifier used for this scenario in input files and on the command line
    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentMarket => "current-market",
            Self::Optimistic => "optimistic",
            Self::Conservative => "conservative",
            Self::CarbonFocused => "carbon-focused",
            Self::Custom => "custom",
        }
    }

    /// A short human-readable description of the scenario
    pub fn description(&self) -> &'static str {
        match self {
            Self::CurrentMarket => "Current market prices and costs",
            Self::Optimistic => "Favourable prices with falling capital and operating costs",
            Self::Conservative => "Depressed prices with rising capital and operating costs",
            Self::CarbonFocused => "Strong carbon market with green investment incentives",
            Self::Custom => "Economic parameters as supplied, without adjustment",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a scenario identifier.
///
/// Matching ignores case and surrounding whitespace, and accepts `_` in place of `-`.
pub fn parse_scenario(s: &str) -> Result<ScenarioType, ConfigurationError> {
    s.trim()
        .replace('_', "-")
        .parse()
        .map_err(|_| ConfigurationError::UnknownScenario(s.to_string()))
}

impl Serialize for ScenarioType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Multiplicative adjustments applied to the baseline economic parameters.
///
/// A value of 1.0 means no adjustment. The discount rate and plant lifetime are never adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioMultipliers {
    /// Multiplier for the commodity price
    pub commodity: f64,
    /// Multiplier for the electricity price
    pub electricity: f64,
    /// Multiplier for the capital cost per unit of capacity
    pub capital: f64,
    /// Multiplier for the operating-cost fraction
    pub operating: f64,
    /// Multiplier for the carbon-credit price
    pub carbon: f64,
}

impl ScenarioMultipliers {
    /// Multipliers which leave every parameter unchanged
    pub const IDENTITY: ScenarioMultipliers = ScenarioMultipliers {
        commodity: 1.0,
        electricity: 1.0,
        capital: 1.0,
        operating: 1.0,
        carbon: 1.0,
    };

    /// Produce the effective economic parameters for this scenario
    pub fn apply(&self, base: &EconomicParameters) -> EconomicParameters {
        EconomicParameters {
            commodity_price: base.commodity_price * self.commodity,
            electricity_price: base.electricity_price * self.electricity,
            capital_cost_per_unit: base.capital_cost_per_unit * self.capital,
            operating_fraction: base.operating_fraction * self.operating,
            carbon_price: base.carbon_price * self.carbon,
            ..*base
        }
    }
}

/// Look up the multipliers for a scenario
pub fn resolve(scenario: ScenarioType) -> ScenarioMultipliers {
    match scenario {
        ScenarioType::CurrentMarket | ScenarioType::Custom => ScenarioMultipliers::IDENTITY,
        ScenarioType::Optimistic => ScenarioMultipliers {
            commodity: 1.3,
            electricity: 1.2,
            capital: 0.8,
            operating: 0.9,
            carbon: 1.5,
        },
        ScenarioType::Conservative => ScenarioMultipliers {
            commodity: 0.8,
            electricity: 0.85,
            capital: 1.2,
            operating: 1.1,
            carbon: 0.7,
        },
        ScenarioType::CarbonFocused => ScenarioMultipliers {
            commodity: 1.0,
            electricity: 1.1,
            capital: 0.9,
            operating: 1.0,
            carbon: 2.0,
        },
    }
}

/// Look up the multipliers for a scenario given by its identifier
pub fn resolve_str(scenario: &str) -> Result<ScenarioMultipliers, ConfigurationError> {
    Ok(resolve(parse_scenario(scenario)?))
}
