//! Code for reading region assignments and region priorities from CSV files.
use super::{input_err_msg, read_csv_optional};
use crate::entity::EntityID;
use crate::regional::{ExternalPriorities, RegionAssignment, RegionID};
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::path::Path;

const REGIONS_FILE_NAME: &str = "regions.csv";
const REGION_PRIORITIES_FILE_NAME: &str = "region_priorities.csv";

#[derive(Deserialize, PartialEq, Debug)]
struct RegionAssignmentRaw {
    entity_id: String,
    region_id: String,
}

#[derive(Deserialize, PartialEq, Debug)]
struct RegionPriorityRaw {
    region_id: String,
    priority: f64,
}

/// Read the region of each entity, if a regions file is present.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `entity_ids` - All known entity IDs
///
/// # Returns
///
/// `None` if there is no regions file, otherwise the assignment or an error.
pub fn read_region_assignment(
    model_dir: &Path,
    entity_ids: &IndexSet<EntityID>,
) -> Result<Option<RegionAssignment>> {
    let file_path = model_dir.join(REGIONS_FILE_NAME);
    let Some(rows) = read_csv_optional::<RegionAssignmentRaw>(&file_path)? else {
        return Ok(None);
    };

    region_assignment_from_iter(rows.into_iter(), entity_ids)
        .map(Some)
        .with_context(|| input_err_msg(&file_path))
}

fn region_assignment_from_iter<I>(
    iter: I,
    entity_ids: &IndexSet<EntityID>,
) -> Result<RegionAssignment>
where
    I: Iterator<Item = RegionAssignmentRaw>,
{
    let mut assignment = IndexMap::new();
    for row in iter {
        let entity_id = entity_ids
            .get(row.entity_id.as_str())
            .with_context(|| format!("Unknown entity ID: {}", row.entity_id))?;
        ensure!(
            !row.region_id.is_empty(),
            "Empty region ID for entity {entity_id}"
        );
        ensure!(
            assignment
                .insert(entity_id.clone(), RegionID::from(row.region_id))
                .is_none(),
            "Entity {entity_id} is assigned to more than one region"
        );
    }

    Ok(RegionAssignment::explicit(assignment))
}

/// Read externally supplied development priorities, if a region priorities file is present.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn read_region_priorities(model_dir: &Path) -> Result<Option<ExternalPriorities>> {
    let file_path = model_dir.join(REGION_PRIORITIES_FILE_NAME);
    let Some(rows) = read_csv_optional::<RegionPriorityRaw>(&file_path)? else {
        return Ok(None);
    };

    region_priorities_from_iter(rows.into_iter())
        .map(Some)
        .with_context(|| input_err_msg(&file_path))
}

fn region_priorities_from_iter<I>(iter: I) -> Result<ExternalPriorities>
where
    I: Iterator<Item = RegionPriorityRaw>,
{
    let mut priorities = IndexMap::new();
    for row in iter {
        ensure!(
            row.priority.is_finite(),
            "Priority for region {} must be a finite number",
            row.region_id
        );
        ensure!(
            priorities
                .insert(RegionID::from(row.region_id.as_str()), row.priority)
                .is_none(),
            "Duplicate priority for region {}",
            row.region_id
        );
    }

    Ok(ExternalPriorities(priorities))
}
