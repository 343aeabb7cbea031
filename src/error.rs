//! Errors which reject a computation before it starts.
use thiserror::Error;

/// A fatal configuration problem.
///
/// These are raised before any entity is evaluated, so a pass which fails with one of these
/// errors produces no results at all.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// The scenario identifier is not one of the known scenarios
    #[error(
        "Unknown scenario '{0}'. Expected one of: current-market, optimistic, conservative, \
        carbon-focused, custom"
    )]
    UnknownScenario(String),
    /// An economic parameter lies outside its valid domain
    #[error("Invalid value for {name} ({value}): must be {constraint}")]
    InvalidParameter {
        /// The parameter's name
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Description of the valid domain
        constraint: &'static str,
    },
    /// The economic weight used for priority scoring is outside [0, 1]
    #[error("Invalid economic weight ({0}): must be a number between 0 and 1 inclusive")]
    InvalidWeight(f64),
}
