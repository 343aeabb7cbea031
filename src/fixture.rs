//! Fixtures for tests

use crate::appraisal::priority::{PriorityScores, PriorityWeight};
use crate::appraisal::{FeasibilityRecord, appraise_entity};
use crate::entity::{Entity, EntityRecord};
use crate::model::{EconomicParameters, Model, ModelParameters};
use crate::regional::RegionAssignment;
use crate::scenario::ScenarioType;
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Build an entity record with the given potentials
fn record(id: &str, name: &str, resource: Option<f64>, energy: Option<f64>) -> EntityRecord {
    EntityRecord {
        id: id.into(),
        name: name.into(),
        population: Some(100_000),
        daily_resource_potential: resource,
        daily_energy_potential: energy,
    }
}

#[fixture]
pub fn economic_parameters() -> EconomicParameters {
    EconomicParameters {
        commodity_price: 0.85,
        electricity_price: 0.55,
        capital_cost_per_unit: 1200.0,
        operating_fraction: 0.05,
        carbon_price: 45.0,
        discount_rate: 0.08,
        lifetime_years: 20,
    }
}

#[fixture]
pub fn entity_record() -> EntityRecord {
    EntityRecord {
        id: "3509502".into(),
        name: "Campinas".into(),
        population: Some(1_139_047),
        daily_resource_potential: Some(1000.0),
        daily_energy_potential: Some(500.0),
    }
}

#[fixture]
pub fn entity(entity_record: EntityRecord) -> Entity {
    Entity::try_from(&entity_record).unwrap()
}

/// A small collection of records: four viable entities, one with no potential and one with
/// missing data
#[fixture]
pub fn entity_records() -> Vec<EntityRecord> {
    vec![
        record("campinas", "Campinas", Some(1000.0), Some(500.0)),
        record("sorocaba", "Sorocaba", Some(2000.0), Some(4000.0)),
        record("jundiai", "Jundiaí", Some(500.0), Some(0.0)),
        record("piracicaba", "Piracicaba", Some(800.0), Some(100.0)),
        record("zero", "Zero Potential", Some(0.0), Some(0.0)),
        record("incomplete", "Incomplete", Some(100.0), None),
    ]
}

/// Explicit regions for [`entity_records`], leaving the `zero` entity unassigned
#[fixture]
pub fn region_assignment() -> RegionAssignment {
    RegionAssignment::explicit(
        [
            ("campinas", "Campinas"),
            ("sorocaba", "Sorocaba"),
            ("jundiai", "Campinas"),
            ("piracicaba", "Campinas"),
        ]
        .into_iter()
        .map(|(entity_id, region_id)| (entity_id.into(), region_id.into()))
        .collect(),
    )
}

#[fixture]
pub fn feasibility_record(
    entity: Entity,
    economic_parameters: EconomicParameters,
) -> FeasibilityRecord {
    let appraisal = appraise_entity(&entity, &economic_parameters);
    let scores = PriorityScores::new(
        appraisal.financials.payback_years,
        appraisal.financials.co2_reduction,
        appraisal.financials.co2_reduction,
        PriorityWeight::new(0.5).unwrap(),
    );
    FeasibilityRecord::new(appraisal, scores)
}

#[fixture]
pub fn model(
    entity_records: Vec<EntityRecord>,
    region_assignment: RegionAssignment,
    economic_parameters: EconomicParameters,
) -> Model {
    Model {
        model_path: PathBuf::from("test_model"),
        parameters: ModelParameters {
            scenario: ScenarioType::CurrentMarket,
            economic_weight: 0.5,
            simulated_regions: Vec::new(),
            economics: economic_parameters,
        },
        entities: entity_records,
        regions: region_assignment,
        region_priorities: None,
    }
}
