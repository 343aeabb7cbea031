//! Collection-relative scoring of entities for investment priority.
//!
//! Economic performance is scored from each entity's payback alone, while environmental
//! performance is normalised against the largest CO2 reduction in the whole collection. This
//! means all entities must have been evaluated before any of them can be scored.
use super::{EntityAppraisal, FeasibilityRecord};
use crate::error::ConfigurationError;

/// The maximum value of any score
pub const MAX_SCORE: f64 = 100.0;

/// Weight given to economic performance in the composite score.
///
/// The remainder of the weight goes to environmental performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityWeight(f64);

impl PriorityWeight {
    /// Create a weight, checking that it lies in [0, 1]
    pub fn new(economic_weight: f64) -> Result<Self, ConfigurationError> {
        if (0.0..=1.0).contains(&economic_weight) {
            Ok(Self(economic_weight))
        } else {
            Err(ConfigurationError::InvalidWeight(economic_weight))
        }
    }

    /// Weight of the economic score
    pub fn economic(&self) -> f64 {
        self.0
    }

    /// Weight of the environmental score
    pub fn environmental(&self) -> f64 {
        1.0 - self.0
    }
}

/// Normalised scores for one entity, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityScores {
    /// Score based on payback period
    pub economic: f64,
    /// Score based on CO2 reduction relative to the best entity
    pub environmental: f64,
    /// Weighted blend of the economic and environmental scores
    pub composite: f64,
}

/// Score an entity's payback period.
///
/// Shorter paybacks score higher. An undefined payback scores zero.
pub fn economic_score(payback_years: Option<f64>) -> f64 {
    payback_years.map_or(0.0, |payback| {
        (MAX_SCORE / (payback + 1.0)).clamp(0.0, MAX_SCORE)
    })
}

/// Score an entity's CO2 reduction relative to the largest in the collection.
///
/// If no entity reduces any CO2, every entity scores zero.
pub fn environmental_score(co2_reduction: f64, max_co2_reduction: f64) -> f64 {
    if max_co2_reduction > 0.0 {
        (MAX_SCORE * co2_reduction / max_co2_reduction).clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

impl PriorityScores {
    /// Calculate scores for one entity, given the largest CO2 reduction in its collection
    pub fn new(
        payback_years: Option<f64>,
        co2_reduction: f64,
        max_co2_reduction: f64,
        weight: PriorityWeight,
    ) -> Self {
        let economic = economic_score(payback_years);
        let environmental = environmental_score(co2_reduction, max_co2_reduction);
        let composite = weight.economic() * economic + weight.environmental() * environmental;

        Self {
            economic,
            environmental,
            composite: composite.clamp(0.0, MAX_SCORE),
        }
    }
}

/// Score every appraisal in a collection, producing the final feasibility records.
///
/// The order of the records matches the order of the appraisals.
pub fn score_appraisals(
    appraisals: Vec<EntityAppraisal>,
    weight: PriorityWeight,
) -> Vec<FeasibilityRecord> {
    // Collection-wide maximum, which must be known before any entity is scored
    let max_co2_reduction = appraisals
        .iter()
        .map(|appraisal| appraisal.financials.co2_reduction)
        .fold(0.0, f64::max);

    appraisals
        .into_iter()
        .map(|appraisal| {
            let scores = PriorityScores::new(
                appraisal.financials.payback_years,
                appraisal.financials.co2_reduction,
                max_co2_reduction,
                weight,
            );
            FeasibilityRecord::new(appraisal, scores)
        })
        .collect()
}
