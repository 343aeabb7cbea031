//! The model represents the static input data for one analysis.
use crate::entity::EntityRecord;
use crate::regional::{ExternalPriorities, RegionAssignment};
use std::path::PathBuf;

pub mod parameters;
pub use parameters::{EconomicParameters, ModelParameters};

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Entity records as supplied, including incomplete ones
    pub entities: Vec<EntityRecord>,
    /// Region to which each entity belongs
    pub regions: RegionAssignment,
    /// Development priorities supplied for each region, if any
    pub region_priorities: Option<ExternalPriorities>,
}
