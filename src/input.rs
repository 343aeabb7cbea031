//! Common routines for handling input data.
use crate::entity::EntityID;
use crate::model::{Model, ModelParameters};
use crate::regional::{RegionAssignment, RegionID};
use anyhow::{Context, Result, bail};
use indexmap::IndexSet;
use itertools::Itertools;
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

mod entity;
use entity::read_entity_records;
mod region;
use region::{read_region_assignment, read_region_priorities};

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = read_csv_internal(file_path)?;
    if vec.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }

    Ok(vec)
}

/// Read a series of type `T`s from a CSV file, returning `None` if the file is not present.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<T: DeserializeOwned>(file_path: &Path) -> Result<Option<Vec<T>>> {
    if !file_path.exists() {
        return Ok(None);
    }

    read_csv_internal(file_path).map(Some)
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Load a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The static model data ([`Model`]) or an error.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let entities = read_entity_records(model_dir)?;
    let entity_ids: IndexSet<EntityID> = entities.iter().map(|record| record.id.clone()).collect();

    let regions = if let Some(regions) = read_region_assignment(model_dir, &entity_ids)? {
        regions
    } else {
        info!("No region file found: simulating region assignment");
        let region_names = parameters
            .simulated_regions
            .iter()
            .map(|name| RegionID::from(name.as_str()))
            .collect_vec();
        RegionAssignment::simulated(&entity_ids, &region_names)
    };

    let region_priorities = read_region_priorities(model_dir)?;

    Ok(Model {
        model_path: model_dir.to_path_buf(),
        parameters,
        entities,
        regions,
        region_priorities,
    })
}
