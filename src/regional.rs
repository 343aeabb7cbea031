//! Regional aggregation and ranking of appraised entities.
use crate::appraisal::FeasibilityRecord;
use crate::entity::EntityID;
use crate::id::define_id_type;
use indexmap::IndexMap;
use log::warn;

define_id_type! {RegionID}

/// Region given to entities which are missing from an explicit assignment
pub const UNASSIGNED_REGION: &str = "Unassigned";

/// Region names used for the simulated assignment when none are configured.
///
/// These are administrative regions of the state of São Paulo.
pub const DEFAULT_SIMULATED_REGIONS: [&str; 8] = [
    "Metropolitana",
    "Campinas",
    "Sorocaba",
    "Ribeirão Preto",
    "São José do Rio Preto",
    "Bauru",
    "Presidente Prudente",
    "Vale do Paraíba",
];

/// Entities with a payback below this many years count as feasible in regional summaries
pub const FEASIBLE_PAYBACK_YEARS: f64 = 10.0;

/// The region to which each entity belongs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionAssignment(IndexMap<EntityID, RegionID>);

impl RegionAssignment {
    /// Use region labels supplied by the data provider
    pub fn explicit(assignment: IndexMap<EntityID, RegionID>) -> Self {
        Self(assignment)
    }

    /// Simulate a region assignment by distributing entities over regions in turn.
    ///
    /// This is a placeholder policy for when no regional data is available. It is deterministic:
    /// the n-th entity goes to region n modulo the number of regions. If `region_names` is empty,
    /// [`DEFAULT_SIMULATED_REGIONS`] is used.
    pub fn simulated<'a, I>(entity_ids: I, region_names: &[RegionID]) -> Self
    where
        I: IntoIterator<Item = &'a EntityID>,
    {
        let default_names: Vec<RegionID>;
        let region_names = if region_names.is_empty() {
            default_names = DEFAULT_SIMULATED_REGIONS.map(RegionID::from).to_vec();
            &default_names
        } else {
            region_names
        };

        Self(
            entity_ids
                .into_iter()
                .zip(region_names.iter().cycle())
                .map(|(entity_id, region_id)| (entity_id.clone(), region_id.clone()))
                .collect(),
        )
    }

    /// The region for the given entity
    pub fn region_of(&self, entity_id: &EntityID) -> RegionID {
        self.0
            .get(entity_id)
            .cloned()
            .unwrap_or_else(|| UNASSIGNED_REGION.into())
    }

    /// Number of entities with an assigned region
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no entity has an assigned region
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Aggregate statistics for the entities in one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalSummary {
    /// The region
    pub region_id: RegionID,
    /// Number of entities in the region
    pub entity_count: usize,
    /// Summed investment
    pub total_investment: f64,
    /// Summed annual revenue
    pub total_revenue: f64,
    /// Mean payback over entities with a defined payback, if there are any
    pub mean_payback_years: Option<f64>,
    /// Number of entities with a payback below [`FEASIBLE_PAYBACK_YEARS`]
    pub feasible_count: usize,
    /// Summed annual CO2 reduction in tonnes
    pub total_co2_reduction: f64,
    /// Summed NPV
    pub total_npv: f64,
    /// How strongly the region should be prioritised for development (higher is more urgent)
    pub development_priority: f64,
}

/// A policy for the development priority of a region.
pub trait DevelopmentPriority {
    /// The development priority of a region.
    ///
    /// Called with a summary whose other fields are complete; its `development_priority` field
    /// is not yet set.
    fn priority_of(&self, summary: &RegionalSummary) -> f64;
}

/// Default heuristic, used when no external ranking signal exists: the percentage of a region's
/// entities which are feasible
#[derive(Debug, Clone, Copy, Default)]
pub struct FeasibleShare;

impl DevelopmentPriority for FeasibleShare {
    fn priority_of(&self, summary: &RegionalSummary) -> f64 {
        if summary.entity_count == 0 {
            return 0.0;
        }

        100.0 * summary.feasible_count as f64 / summary.entity_count as f64
    }
}

/// Development priorities supplied by the caller for each region.
///
/// Regions without a supplied priority get zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalPriorities(pub IndexMap<RegionID, f64>);

impl DevelopmentPriority for ExternalPriorities {
    fn priority_of(&self, summary: &RegionalSummary) -> f64 {
        self.0
            .get(&summary.region_id)
            .copied()
            .unwrap_or_else(|| {
                warn!("No development priority given for region {}", summary.region_id);
                0.0
            })
    }
}

/// Running totals for one region
#[derive(Default)]
struct RegionTotals {
    entity_count: usize,
    total_investment: f64,
    total_revenue: f64,
    payback_sum: f64,
    payback_count: usize,
    feasible_count: usize,
    total_co2_reduction: f64,
    total_npv: f64,
}

impl RegionTotals {
    fn add(&mut self, record: &FeasibilityRecord) {
        let financials = &record.financials;
        self.entity_count += 1;
        self.total_investment += financials.investment;
        self.total_revenue += financials.revenue.total;
        self.total_co2_reduction += financials.co2_reduction;
        self.total_npv += financials.npv;
        if let Some(payback) = financials.payback_years {
            self.payback_sum += payback;
            self.payback_count += 1;
            if payback < FEASIBLE_PAYBACK_YEARS {
                self.feasible_count += 1;
            }
        }
    }

    fn into_summary(self, region_id: RegionID) -> RegionalSummary {
        RegionalSummary {
            region_id,
            entity_count: self.entity_count,
            total_investment: self.total_investment,
            total_revenue: self.total_revenue,
            mean_payback_years: (self.payback_count > 0)
                .then(|| self.payback_sum / self.payback_count as f64),
            feasible_count: self.feasible_count,
            total_co2_reduction: self.total_co2_reduction,
            total_npv: self.total_npv,
            development_priority: 0.0,
        }
    }
}

/// Group feasibility records by region and summarise each group.
///
/// Regions appear in the order in which they are first encountered.
///
/// # Arguments
///
/// * `records` - The complete, scored collection of feasibility records
/// * `region_of` - Gives the region for an entity
/// * `priority` - Policy for each region's development priority
pub fn aggregate<F>(
    records: &[FeasibilityRecord],
    region_of: F,
    priority: &dyn DevelopmentPriority,
) -> Vec<RegionalSummary>
where
    F: Fn(&EntityID) -> RegionID,
{
    let mut totals: IndexMap<RegionID, RegionTotals> = IndexMap::new();
    for record in records {
        totals
            .entry(region_of(&record.entity_id))
            .or_default()
            .add(record);
    }

    totals
        .into_iter()
        .map(|(region_id, totals)| {
            let mut summary = totals.into_summary(region_id);
            summary.development_priority = priority.priority_of(&summary);
            summary
        })
        .collect()
}

/// Order regional summaries by development priority, highest first.
///
/// Ties are broken by region ID so that the order is reproducible.
pub fn rank(mut summaries: Vec<RegionalSummary>) -> Vec<RegionalSummary> {
    summaries.sort_by(|a, b| {
        b.development_priority
            .total_cmp(&a.development_priority)
            .then_with(|| a.region_id.cmp(&b.region_id))
    });
    summaries
}

/// The `n` highest-priority regions from a ranked list
pub fn recommend(ranked: &[RegionalSummary], n: usize) -> &[RegionalSummary] {
    &ranked[..n.min(ranked.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::feasibility_record;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn record_with(id: &str, payback: Option<f64>, base: &FeasibilityRecord) -> FeasibilityRecord {
        let mut record = base.clone();
        record.entity_id = id.into();
        record.financials.payback_years = payback;
        record
    }

    fn summary(region: &str, priority: f64) -> RegionalSummary {
        RegionalSummary {
            region_id: region.into(),
            entity_count: 1,
            total_investment: 0.0,
            total_revenue: 0.0,
            mean_payback_years: None,
            feasible_count: 0,
            total_co2_reduction: 0.0,
            total_npv: 0.0,
            development_priority: priority,
        }
    }

    #[test]
    fn simulated_assignment_is_round_robin() {
        let ids: Vec<EntityID> = ["a", "b", "c"].map(EntityID::from).to_vec();
        let regions = [RegionID::from("North"), RegionID::from("South")];
        let assignment = RegionAssignment::simulated(&ids, &regions);

        assert_eq!(assignment.region_of(&ids[0]), regions[0]);
        assert_eq!(assignment.region_of(&ids[1]), regions[1]);
        assert_eq!(assignment.region_of(&ids[2]), regions[0]);
    }

    #[test]
    fn simulated_assignment_defaults() {
        let ids: Vec<EntityID> = ["a", "b"].map(EntityID::from).to_vec();
        let assignment = RegionAssignment::simulated(&ids, &[]);
        assert_eq!(assignment.len(), 2);
        assert_eq!(
            assignment.region_of(&ids[1]),
            RegionID::from(DEFAULT_SIMULATED_REGIONS[1])
        );
    }

    #[test]
    fn region_of_unknown_entity() {
        let assignment = RegionAssignment::default();
        assert!(assignment.is_empty());
        assert_eq!(
            assignment.region_of(&"a".into()),
            RegionID::from(UNASSIGNED_REGION)
        );
    }

    #[rstest]
    fn aggregate_groups_and_sums(feasibility_record: FeasibilityRecord) {
        let records = [
            record_with("a", Some(4.0), &feasibility_record),
            record_with("b", Some(12.0), &feasibility_record),
            record_with("c", None, &feasibility_record),
            record_with("d", Some(2.0), &feasibility_record),
        ];
        let region_of = |id: &EntityID| -> RegionID {
            if id.as_str() == "d" {
                "South".into()
            } else {
                "North".into()
            }
        };

        let summaries = aggregate(&records, region_of, &FeasibleShare);
        assert_eq!(summaries.len(), 2);

        let north = &summaries[0];
        assert_eq!(north.region_id, RegionID::from("North"));
        assert_eq!(north.entity_count, 3);
        assert_eq!(north.feasible_count, 1);
        assert_approx_eq!(f64, north.mean_payback_years.unwrap(), 8.0);
        assert_approx_eq!(
            f64,
            north.total_investment,
            3.0 * feasibility_record.financials.investment
        );
        assert_approx_eq!(f64, north.development_priority, 100.0 / 3.0);

        let south = &summaries[1];
        assert_eq!(south.entity_count, 1);
        assert_approx_eq!(f64, south.development_priority, 100.0);
    }

    #[rstest]
    fn aggregate_no_defined_payback(feasibility_record: FeasibilityRecord) {
        let records = [record_with("a", None, &feasibility_record)];
        let summaries = aggregate(&records, |_| "North".into(), &FeasibleShare);
        assert_eq!(summaries[0].mean_payback_years, None);
        assert_eq!(summaries[0].development_priority, 0.0);
    }

    #[rstest]
    fn aggregate_external_priorities(feasibility_record: FeasibilityRecord) {
        let records = [
            record_with("a", Some(4.0), &feasibility_record),
            record_with("b", Some(4.0), &feasibility_record),
        ];
        let priorities = ExternalPriorities([("North".into(), 7.5)].into_iter().collect());
        let summaries = aggregate(
            &records,
            |id: &EntityID| -> RegionID {
                if id.as_str() == "a" {
                    "North".into()
                } else {
                    "East".into()
                }
            },
            &priorities,
        );

        assert_eq!(summaries[0].development_priority, 7.5);
        assert_eq!(summaries[1].development_priority, 0.0);
    }

    #[test]
    fn rank_orders_by_priority_then_id() {
        let ranked = rank(vec![
            summary("B", 10.0),
            summary("C", 50.0),
            summary("A", 10.0),
        ]);
        let ids: Vec<_> = ranked.iter().map(|s| s.region_id.as_str()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(10, 3)]
    fn recommend_takes_top_n(#[case] n: usize, #[case] expected_len: usize) {
        let ranked = rank(vec![summary("A", 3.0), summary("B", 2.0), summary("C", 1.0)]);
        let top = recommend(&ranked, n);
        assert_eq!(top.len(), expected_len);
        if let Some(first) = top.first() {
            assert_eq!(first.region_id, RegionID::from("A"));
        }
    }
}
