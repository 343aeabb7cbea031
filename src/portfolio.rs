//! Portfolio-level summaries of an appraisal and comparisons between scenarios.
use crate::appraisal::classify::FeasibilityCategory;
use crate::appraisal::{Appraisal, appraise_model};
use crate::error::ConfigurationError;
use crate::model::Model;
use crate::scenario::ScenarioType;
use indexmap::IndexMap;
use log::info;

/// Totals across every entity in one appraisal
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    /// The scenario under which the entities were appraised
    pub scenario: ScenarioType,
    /// Number of entities appraised
    pub entity_count: usize,
    /// Number of entities skipped because of incomplete data
    pub skipped_count: usize,
    /// Summed investment
    pub total_investment: f64,
    /// Summed annual revenue
    pub total_revenue: f64,
    /// Summed NPV
    pub total_npv: f64,
    /// Summed annual CO2 reduction in tonnes
    pub total_co2_reduction: f64,
    /// Mean payback over entities with a defined payback
    pub mean_payback_years: Option<f64>,
    /// Number of entities in each feasibility tier
    pub category_counts: IndexMap<FeasibilityCategory, usize>,
}

impl PortfolioSummary {
    /// Summarise an appraisal
    pub fn from_appraisal(appraisal: &Appraisal) -> Self {
        let mut category_counts: IndexMap<_, _> = FeasibilityCategory::ALL
            .into_iter()
            .map(|category| (category, 0))
            .collect();
        let mut payback_sum = 0.0;
        let mut payback_count = 0usize;
        let mut summary = Self {
            scenario: appraisal.scenario,
            entity_count: appraisal.records.len(),
            skipped_count: appraisal.skipped.len(),
            total_investment: 0.0,
            total_revenue: 0.0,
            total_npv: 0.0,
            total_co2_reduction: 0.0,
            mean_payback_years: None,
            category_counts: IndexMap::new(),
        };

        for record in &appraisal.records {
            let financials = &record.financials;
            summary.total_investment += financials.investment;
            summary.total_revenue += financials.revenue.total;
            summary.total_npv += financials.npv;
            summary.total_co2_reduction += financials.co2_reduction;
            if let Some(payback) = financials.payback_years {
                payback_sum += payback;
                payback_count += 1;
            }
            *category_counts.entry(record.feasibility).or_default() += 1;
        }

        summary.mean_payback_years =
            (payback_count > 0).then(|| payback_sum / payback_count as f64);
        summary.category_counts = category_counts;
        summary
    }

    /// Number of entities in the given feasibility tier
    pub fn count(&self, category: FeasibilityCategory) -> usize {
        self.category_counts.get(&category).copied().unwrap_or_default()
    }

    /// Write the summary to the log
    pub fn log(&self) {
        info!(
            "{} entities appraised ({} skipped): total investment {:.2}, revenue {:.2}/year, \
            NPV {:.2}, CO2 reduction {:.2} t/year",
            self.entity_count,
            self.skipped_count,
            self.total_investment,
            self.total_revenue,
            self.total_npv,
            self.total_co2_reduction
        );
        for (category, count) in &self.category_counts {
            info!("  {category}: {count}");
        }
    }
}

/// Appraise a model under every preset scenario and summarise each.
///
/// The custom scenario is left out as it leaves the parameters unchanged. Each scenario is a full
/// recomputation from the model's inputs.
pub fn compare_scenarios(
    model: &Model,
    economic_weight: Option<f64>,
) -> Result<Vec<PortfolioSummary>, ConfigurationError> {
    ScenarioType::ALL
        .into_iter()
        .filter(|scenario| *scenario != ScenarioType::Custom)
        .map(|scenario| {
            let appraisal = appraise_model(model, Some(scenario), economic_weight)?;
            Ok(PortfolioSummary::from_appraisal(&appraisal))
        })
        .collect()
}
