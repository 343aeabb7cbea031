//! Code for reading entity records from a CSV file.
use super::read_csv;
use crate::entity::EntityRecord;
use anyhow::Result;
use std::path::Path;

const ENTITIES_FILE_NAME: &str = "entities.csv";

/// Read entity records from the specified model directory.
///
/// Missing numeric values are kept as `None`: whether an entity can be evaluated is decided when
/// the appraisal runs, not when the file is read.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The entity records in file order, or an error if the file is missing, empty or malformed.
pub fn read_entity_records(model_dir: &Path) -> Result<Vec<EntityRecord>> {
    read_csv(&model_dir.join(ENTITIES_FILE_NAME))
}
