//! The appraisal pipeline: evaluate, classify, score and aggregate a collection of entities.
//!
//! Each pass is a pure recomputation from its inputs. Evaluation and classification are
//! per-entity; scoring needs every entity's results first (for normalisation) and regional
//! aggregation needs every entity's scores.
use crate::entity::{Entity, EntityID, EntityRecord, SkippedEntity, screen_entities};
use crate::error::ConfigurationError;
use crate::model::{EconomicParameters, Model};
use crate::regional::{
    DevelopmentPriority, FeasibleShare, RegionAssignment, RegionalSummary, aggregate, rank,
};
use crate::scenario::{ScenarioMultipliers, ScenarioType, resolve};
use log::{debug, info, warn};

pub mod classify;
pub mod financial;
pub mod priority;
use classify::{FeasibilityCategory, RiskCategory, classify};
use financial::{FinancialOutcome, evaluate};
use priority::{PriorityScores, PriorityWeight, score_appraisals};

/// The financial outcome and classification of one entity, before collection-wide scoring
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAppraisal {
    /// The entity's identifier
    pub entity_id: EntityID,
    /// The entity's display name
    pub name: String,
    /// The entity's population
    pub population: u64,
    /// Revenues, costs and returns
    pub financials: FinancialOutcome,
    /// Feasibility tier
    pub feasibility: FeasibilityCategory,
    /// Risk tier
    pub risk: RiskCategory,
}

/// The complete, scored appraisal of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityRecord {
    /// The entity's identifier
    pub entity_id: EntityID,
    /// The entity's display name
    pub name: String,
    /// The entity's population
    pub population: u64,
    /// Revenues, costs and returns
    pub financials: FinancialOutcome,
    /// Feasibility tier
    pub feasibility: FeasibilityCategory,
    /// Risk tier
    pub risk: RiskCategory,
    /// Normalised priority scores
    pub scores: PriorityScores,
}

impl FeasibilityRecord {
    /// Combine an appraisal with its priority scores
    pub fn new(appraisal: EntityAppraisal, scores: PriorityScores) -> Self {
        Self {
            entity_id: appraisal.entity_id,
            name: appraisal.name,
            population: appraisal.population,
            financials: appraisal.financials,
            feasibility: appraisal.feasibility,
            risk: appraisal.risk,
            scores,
        }
    }
}

/// Evaluate and classify a single entity
pub fn appraise_entity(entity: &Entity, params: &EconomicParameters) -> EntityAppraisal {
    let financials = evaluate(entity, params);
    let (feasibility, risk) = classify(financials.payback_years);

    EntityAppraisal {
        entity_id: entity.id.clone(),
        name: entity.name.clone(),
        population: entity.population,
        financials,
        feasibility,
        risk,
    }
}

/// Evaluate, classify and score a collection of complete entities.
///
/// `params` are the effective economic parameters, i.e. with any scenario already applied.
pub fn appraise_entities(
    entities: &[Entity],
    params: &EconomicParameters,
    weight: PriorityWeight,
) -> Vec<FeasibilityRecord> {
    let appraisals = entities
        .iter()
        .map(|entity| appraise_entity(entity, params))
        .collect();

    score_appraisals(appraisals, weight)
}

/// The results of one appraisal pass
#[derive(Debug, Clone, PartialEq)]
pub struct Appraisal {
    /// The scenario applied
    pub scenario: ScenarioType,
    /// The scenario's multipliers
    pub multipliers: ScenarioMultipliers,
    /// The economic parameters after applying the scenario
    pub effective_parameters: EconomicParameters,
    /// The economic weight used for priority scores
    pub weight: PriorityWeight,
    /// One record per complete entity, in input order
    pub records: Vec<FeasibilityRecord>,
    /// Regional summaries, ranked by development priority
    pub regions: Vec<RegionalSummary>,
    /// Entities excluded because of incomplete data
    pub skipped: Vec<SkippedEntity>,
}

impl Appraisal {
    /// Number of entity records supplied, including skipped ones
    pub fn total_entities(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    /// The records ordered by composite priority score, highest first.
    ///
    /// Ties keep their input order.
    pub fn records_by_priority(&self) -> Vec<&FeasibilityRecord> {
        let mut records: Vec<_> = self.records.iter().collect();
        records.sort_by(|a, b| b.scores.composite.total_cmp(&a.scores.composite));
        records
    }

    /// Write a warning for each skipped entity to the log
    pub fn log_skipped(&self) {
        if self.skipped.is_empty() {
            return;
        }

        for skipped in &self.skipped {
            warn!(
                "Skipped entity {} ({}): {}",
                skipped.id, skipped.name, skipped.reason
            );
        }
        warn!(
            "{} of {} entities skipped due to missing or invalid data",
            self.skipped.len(),
            self.total_entities()
        );
    }
}

/// Run a complete appraisal pass.
///
/// The configuration is checked before any entity is evaluated: on error, nothing is computed.
/// Entity records with missing data are skipped and reported in [`Appraisal::skipped`].
///
/// # Arguments
///
/// * `records` - Entity records from the data provider
/// * `base_parameters` - Baseline economic parameters
/// * `scenario` - The market scenario to apply
/// * `economic_weight` - Weight of economic performance in the priority score, in [0, 1]
/// * `regions` - The region to which each entity belongs
/// * `priority` - Policy for the development priority of each region
pub fn appraise(
    records: &[EntityRecord],
    base_parameters: &EconomicParameters,
    scenario: ScenarioType,
    economic_weight: f64,
    regions: &RegionAssignment,
    priority: &dyn DevelopmentPriority,
) -> Result<Appraisal, ConfigurationError> {
    base_parameters.validate()?;
    let weight = PriorityWeight::new(economic_weight)?;
    let multipliers = resolve(scenario);
    let effective_parameters = multipliers.apply(base_parameters);
    effective_parameters.validate()?;
    debug!("Scenario {scenario}: effective parameters {effective_parameters:?}");

    let (entities, skipped) = screen_entities(records);
    let records = appraise_entities(&entities, &effective_parameters, weight);
    info!(
        "Appraised {} entities under the {scenario} scenario",
        records.len()
    );

    let regions = rank(aggregate(&records, |id| regions.region_of(id), priority));

    Ok(Appraisal {
        scenario,
        multipliers,
        effective_parameters,
        weight,
        records,
        regions,
        skipped,
    })
}

/// Run an appraisal pass for a model, optionally overriding its scenario and weight.
///
/// Region priorities supplied with the model take precedence over the default
/// [`FeasibleShare`] heuristic.
pub fn appraise_model(
    model: &Model,
    scenario: Option<ScenarioType>,
    economic_weight: Option<f64>,
) -> Result<Appraisal, ConfigurationError> {
    let scenario = scenario.unwrap_or(model.parameters.scenario);
    let economic_weight = economic_weight.unwrap_or(model.parameters.economic_weight);
    let priority: &dyn DevelopmentPriority = match &model.region_priorities {
        Some(priorities) => priorities,
        None => &FeasibleShare,
    };

    appraise(
        &model.entities,
        &model.parameters.economics,
        scenario,
        economic_weight,
        &model.regions,
        priority,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{economic_parameters, entity_records, region_assignment};
    use rstest::rstest;

    #[rstest]
    fn appraise_skips_incomplete_records(
        entity_records: Vec<EntityRecord>,
        economic_parameters: EconomicParameters,
        region_assignment: RegionAssignment,
    ) {
        let appraisal = appraise(
            &entity_records,
            &economic_parameters,
            ScenarioType::CurrentMarket,
            0.5,
            &region_assignment,
            &FeasibleShare,
        )
        .unwrap();

        assert_eq!(appraisal.total_entities(), entity_records.len());
        assert_eq!(appraisal.skipped.len(), 1);
        assert_eq!(appraisal.skipped[0].id, EntityID::from("incomplete"));
        assert!(
            appraisal
                .records
                .iter()
                .all(|record| record.entity_id != EntityID::from("incomplete"))
        );
    }

    #[rstest]
    fn appraise_rejects_invalid_configuration(
        entity_records: Vec<EntityRecord>,
        economic_parameters: EconomicParameters,
        region_assignment: RegionAssignment,
    ) {
        let invalid = EconomicParameters {
            lifetime_years: 0,
            ..economic_parameters
        };
        let result = appraise(
            &entity_records,
            &invalid,
            ScenarioType::Optimistic,
            0.5,
            &region_assignment,
            &FeasibleShare,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidParameter {
                name: "lifetime_years",
                ..
            })
        ));

        let result = appraise(
            &entity_records,
            &economic_parameters,
            ScenarioType::Optimistic,
            -0.5,
            &region_assignment,
            &FeasibleShare,
        );
        assert_eq!(result, Err(ConfigurationError::InvalidWeight(-0.5)));
    }

    #[rstest]
    fn appraise_keeps_unviable_entities(
        entity_records: Vec<EntityRecord>,
        economic_parameters: EconomicParameters,
        region_assignment: RegionAssignment,
    ) {
        let appraisal = appraise(
            &entity_records,
            &economic_parameters,
            ScenarioType::CurrentMarket,
            0.5,
            &region_assignment,
            &FeasibleShare,
        )
        .unwrap();

        let zero = appraisal
            .records
            .iter()
            .find(|record| record.entity_id == EntityID::from("zero"))
            .unwrap();
        assert_eq!(zero.financials.payback_years, None);
        assert_eq!(zero.feasibility, FeasibilityCategory::NotFeasible);
        assert_eq!(zero.risk, RiskCategory::VeryHigh);
        assert_eq!(zero.scores.economic, 0.0);
    }

    #[rstest]
    fn scenario_changes_results(
        entity_records: Vec<EntityRecord>,
        economic_parameters: EconomicParameters,
        region_assignment: RegionAssignment,
    ) {
        let run = |scenario| {
            appraise(
                &entity_records,
                &economic_parameters,
                scenario,
                0.5,
                &region_assignment,
                &FeasibleShare,
            )
            .unwrap()
        };
        let current = run(ScenarioType::CurrentMarket);
        let optimistic = run(ScenarioType::Optimistic);
        let custom = run(ScenarioType::Custom);

        assert_eq!(current.records, custom.records);
        for (a, b) in current.records.iter().zip(&optimistic.records) {
            assert!(b.financials.investment <= a.financials.investment);
            assert!(b.financials.revenue.total >= a.financials.revenue.total);
        }
    }

    #[rstest]
    fn records_by_priority_is_descending(
        entity_records: Vec<EntityRecord>,
        economic_parameters: EconomicParameters,
        region_assignment: RegionAssignment,
    ) {
        let appraisal = appraise(
            &entity_records,
            &economic_parameters,
            ScenarioType::CurrentMarket,
            0.5,
            &region_assignment,
            &FeasibleShare,
        )
        .unwrap();

        let scores: Vec<_> = appraisal
            .records_by_priority()
            .iter()
            .map(|record| record.scores.composite)
            .collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
