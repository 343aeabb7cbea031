//! Classification of entities into feasibility and risk tiers by payback period.
use serde::{Serialize, Serializer};
use std::fmt;

/// Upper payback bounds (exclusive) for each feasibility tier, best first
const FEASIBILITY_THRESHOLDS: [(f64, FeasibilityCategory); 3] = [
    (5.0, FeasibilityCategory::HighlyFeasible),
    (10.0, FeasibilityCategory::Feasible),
    (15.0, FeasibilityCategory::Marginal),
];

/// Upper payback bounds (exclusive) for each risk tier, best first
const RISK_THRESHOLDS: [(f64, RiskCategory); 3] = [
    (3.0, RiskCategory::Low),
    (7.0, RiskCategory::Medium),
    (12.0, RiskCategory::High),
];

/// Feasibility tier, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeasibilityCategory {
    /// Payback under 5 years
    HighlyFeasible,
    /// Payback from 5 to under 10 years
    Feasible,
    /// Payback from 10 to under 15 years
    Marginal,
    /// Payback of 15 years or more, or undefined
    NotFeasible,
}

/// Risk tier, ordered from lowest to highest risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskCategory {
    /// Payback under 3 years
    Low,
    /// Payback from 3 to under 7 years
    Medium,
    /// Payback from 7 to under 12 years
    High,
    /// Payback of 12 years or more, or undefined
    VeryHigh,
}

/// Find the first tier whose bound the payback lies under, falling back to `worst`
fn band<T: Copy>(payback_years: Option<f64>, thresholds: &[(f64, T)], worst: T) -> T {
    let Some(payback_years) = payback_years else {
        return worst;
    };

    thresholds
        .iter()
        .find(|(bound, _)| payback_years < *bound)
        .map_or(worst, |(_, tier)| *tier)
}

impl FeasibilityCategory {
    /// All tiers, best first
    pub const ALL: [FeasibilityCategory; 4] = [
        Self::HighlyFeasible,
        Self::Feasible,
        Self::Marginal,
        Self::NotFeasible,
    ];

    /// Classify a payback period
    pub fn from_payback(payback_years: Option<f64>) -> Self {
        band(payback_years, &FEASIBILITY_THRESHOLDS, Self::NotFeasible)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlyFeasible => "Highly Feasible",
            Self::Feasible => "Feasible",
            Self::Marginal => "Marginal",
            Self::NotFeasible => "Not Feasible",
        }
    }
}

impl RiskCategory {
    /// Classify a payback period
    pub fn from_payback(payback_years: Option<f64>) -> Self {
        band(payback_years, &RISK_THRESHOLDS, Self::VeryHigh)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

/// Classify a payback period on both the feasibility and risk scales
pub fn classify(payback_years: Option<f64>) -> (FeasibilityCategory, RiskCategory) {
    (
        FeasibilityCategory::from_payback(payback_years),
        RiskCategory::from_payback(payback_years),
    )
}

macro_rules! impl_label_traits {
    ($type:ty) => {
        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

impl_label_traits!(FeasibilityCategory);
impl_label_traits!(RiskCategory);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.0), FeasibilityCategory::HighlyFeasible)]
    #[case(Some(4.99), FeasibilityCategory::HighlyFeasible)]
    #[case(Some(5.0), FeasibilityCategory::Feasible)]
    #[case(Some(9.99), FeasibilityCategory::Feasible)]
    #[case(Some(10.0), FeasibilityCategory::Marginal)]
    #[case(Some(14.99), FeasibilityCategory::Marginal)]
    #[case(Some(15.0), FeasibilityCategory::NotFeasible)]
    #[case(Some(100.0), FeasibilityCategory::NotFeasible)]
    #[case(None, FeasibilityCategory::NotFeasible)]
    fn feasibility_from_payback(
        #[case] payback: Option<f64>,
        #[case] expected: FeasibilityCategory,
    ) {
        assert_eq!(FeasibilityCategory::from_payback(payback), expected);
    }

    #[rstest]
    #[case(Some(2.99), RiskCategory::Low)]
    #[case(Some(3.0), RiskCategory::Medium)]
    #[case(Some(6.99), RiskCategory::Medium)]
    #[case(Some(7.0), RiskCategory::High)]
    #[case(Some(11.99), RiskCategory::High)]
    #[case(Some(12.0), RiskCategory::VeryHigh)]
    #[case(None, RiskCategory::VeryHigh)]
    fn risk_from_payback(#[case] payback: Option<f64>, #[case] expected: RiskCategory) {
        assert_eq!(RiskCategory::from_payback(payback), expected);
    }

    #[test]
    fn classify_worked_example() {
        assert_eq!(
            classify(Some(3.39)),
            (FeasibilityCategory::HighlyFeasible, RiskCategory::Medium)
        );
        assert_eq!(
            classify(Some(2.5)),
            (FeasibilityCategory::HighlyFeasible, RiskCategory::Low)
        );
    }

    #[test]
    fn categories_are_ordered() {
        assert!(FeasibilityCategory::HighlyFeasible < FeasibilityCategory::NotFeasible);
        assert!(RiskCategory::Low < RiskCategory::VeryHigh);
    }

    #[test]
    fn labels() {
        assert_eq!(FeasibilityCategory::NotFeasible.to_string(), "Not Feasible");
        assert_eq!(RiskCategory::VeryHigh.to_string(), "Very High");
    }
}
