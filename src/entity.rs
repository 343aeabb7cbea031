//! Entities are the administrative units (municipalities) whose potential is appraised.
use crate::id::define_id_type;
use indexmap::IndexSet;
use serde::Deserialize;

define_id_type! {EntityID}

/// A record for one entity as supplied by the data provider.
///
/// Numeric fields are optional because the provider may omit them. A cell which cannot be parsed
/// is read as missing, so records with unusable potentials are skipped rather than evaluated.
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct EntityRecord {
    /// Unique identifier for the entity (e.g. the IBGE municipality code)
    pub id: EntityID,
    /// Display name (e.g. "Campinas")
    pub name: String,
    /// Resident population
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub population: Option<u64>,
    /// Baseline resource potential in volume per day
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub daily_resource_potential: Option<f64>,
    /// Baseline energy potential in energy per day
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub daily_energy_potential: Option<f64>,
}

/// An entity with a complete set of validated inputs.
#[derive(PartialEq, Debug, Clone)]
pub struct Entity {
    /// Unique identifier for the entity
    pub id: EntityID,
    /// Display name
    pub name: String,
    /// Resident population (zero if not supplied)
    pub population: u64,
    /// Baseline resource potential in volume per day
    pub daily_resource_potential: f64,
    /// Baseline energy potential in energy per day
    pub daily_energy_potential: f64,
}

/// An entity which was excluded from a computation pass because its data was incomplete.
#[derive(PartialEq, Debug, Clone)]
pub struct SkippedEntity {
    /// Identifier of the skipped entity
    pub id: EntityID,
    /// Display name of the skipped entity
    pub name: String,
    /// Why the entity was skipped
    pub reason: String,
}

/// Check that a required potential is present, finite and non-negative
fn check_potential(value: Option<f64>, field: &str) -> Result<f64, String> {
    let Some(value) = value else {
        return Err(format!("missing or unreadable value for {field}"));
    };

    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "{field} must be a finite, non-negative number (got {value})"
        ));
    }

    Ok(value)
}

impl TryFrom<&EntityRecord> for Entity {
    type Error = String;

    fn try_from(record: &EntityRecord) -> Result<Self, Self::Error> {
        let daily_resource_potential =
            check_potential(record.daily_resource_potential, "daily_resource_potential")?;
        let daily_energy_potential =
            check_potential(record.daily_energy_potential, "daily_energy_potential")?;

        Ok(Entity {
            id: record.id.clone(),
            name: record.name.clone(),
            population: record.population.unwrap_or_default(),
            daily_resource_potential,
            daily_energy_potential,
        })
    }
}

/// Split entity records into complete entities and diagnostics for the records that were skipped.
///
/// Records with a missing or invalid potential, or with an ID which has already been seen, are
/// skipped. The order of the remaining entities is preserved.
pub fn screen_entities(records: &[EntityRecord]) -> (Vec<Entity>, Vec<SkippedEntity>) {
    let mut seen = IndexSet::new();
    let mut entities = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        let result = if seen.insert(record.id.clone()) {
            Entity::try_from(record)
        } else {
            Err("duplicate entity ID".to_string())
        };

        match result {
            Ok(entity) => entities.push(entity),
            Err(reason) => skipped.push(SkippedEntity {
                id: record.id.clone(),
                name: record.name.clone(),
                reason,
            }),
        }
    }

    (entities, skipped)
}
