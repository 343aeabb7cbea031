//! Revenue, cost and return calculations for a single entity.
use crate::entity::Entity;
use crate::finance::{net_present_value, simple_payback};
use crate::model::EconomicParameters;

/// Number of days of operation in a year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// CO2 avoided per unit of energy produced, in kg
pub const CO2_KG_PER_ENERGY_UNIT: f64 = 0.45;

const KG_PER_TONNE: f64 = 1000.0;

/// Annual revenue from each stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueBreakdown {
    /// Revenue from selling the resource (e.g. biomethane)
    pub commodity: f64,
    /// Revenue from selling electricity
    pub electricity: f64,
    /// Revenue from carbon credits
    pub carbon: f64,
    /// Sum of all revenue streams
    pub total: f64,
}

/// The financial performance of one entity under a given set of economic parameters.
///
/// All flows are per year except `investment` and `npv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialOutcome {
    /// Annual revenue
    pub revenue: RevenueBreakdown,
    /// CO2 avoided, in tonnes per year
    pub co2_reduction: f64,
    /// Upfront capital investment
    pub investment: f64,
    /// Annual operating cost
    pub operating_cost: f64,
    /// Annual revenue less operating cost
    pub net_profit: f64,
    /// Simple payback period in years, if defined
    pub payback_years: Option<f64>,
    /// Net present value over the plant lifetime
    pub npv: f64,
}

/// Calculate the financial outcome for an entity.
///
/// Economically unviable entities are not an error: a non-positive net profit gives an undefined
/// payback and a well-defined (negative) NPV.
pub fn evaluate(entity: &Entity, params: &EconomicParameters) -> FinancialOutcome {
    let annual_resource = entity.daily_resource_potential * DAYS_PER_YEAR;
    let annual_energy = entity.daily_energy_potential * DAYS_PER_YEAR;

    let commodity = annual_resource * params.commodity_price;
    let electricity = annual_energy * params.electricity_price;
    let co2_reduction = annual_energy * CO2_KG_PER_ENERGY_UNIT / KG_PER_TONNE;
    let carbon = co2_reduction * params.carbon_price;
    let revenue = RevenueBreakdown {
        commodity,
        electricity,
        carbon,
        total: commodity + electricity + carbon,
    };

    // Plant capacity is sized to the daily resource potential
    let investment = entity.daily_resource_potential * params.capital_cost_per_unit;
    let operating_cost = investment * params.operating_fraction;
    let net_profit = revenue.total - operating_cost;

    FinancialOutcome {
        revenue,
        co2_reduction,
        investment,
        operating_cost,
        net_profit,
        payback_years: simple_payback(investment, net_profit),
        npv: net_present_value(
            investment,
            net_profit,
            params.discount_rate,
            params.lifetime_years,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{economic_parameters, entity};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn evaluate_worked_example(entity: Entity, economic_parameters: EconomicParameters) {
        let outcome = evaluate(&entity, &economic_parameters);

        assert_approx_eq!(f64, outcome.revenue.commodity, 310_250.0, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.revenue.electricity, 100_375.0, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.co2_reduction, 82.125, epsilon = 1e-9);
        assert_approx_eq!(f64, outcome.revenue.carbon, 3_695.625, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.revenue.total, 414_320.625, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.investment, 1_200_000.0, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.operating_cost, 60_000.0, epsilon = 1e-6);
        assert_approx_eq!(f64, outcome.net_profit, 354_320.625, epsilon = 1e-6);
        assert_approx_eq!(
            f64,
            outcome.payback_years.unwrap(),
            3.386_763_048_298_4,
            epsilon = 1e-9
        );
        assert_approx_eq!(f64, outcome.npv, 2_278_772.125_749_56, epsilon = 1e-3);
    }

    #[rstest]
    fn evaluate_zero_resource_potential(
        mut entity: Entity,
        economic_parameters: EconomicParameters,
    ) {
        entity.daily_resource_potential = 0.0;
        let outcome = evaluate(&entity, &economic_parameters);

        assert_eq!(outcome.investment, 0.0);
        assert_eq!(outcome.operating_cost, 0.0);
        assert_eq!(outcome.payback_years, None);

        // No negative offset: NPV is just the discounted profit
        assert!(outcome.npv > 0.0);
    }

    #[rstest]
    fn evaluate_unprofitable(entity: Entity, economic_parameters: EconomicParameters) {
        let params = EconomicParameters {
            operating_fraction: 1.0,
            ..economic_parameters
        };
        let outcome = evaluate(&entity, &params);

        assert!(outcome.net_profit < 0.0);
        assert_eq!(outcome.payback_years, None);
        assert!(outcome.npv < -outcome.investment);
        assert!(outcome.npv.is_finite());
    }

    #[rstest]
    fn evaluate_zero_discount_rate(entity: Entity, economic_parameters: EconomicParameters) {
        let params = EconomicParameters {
            discount_rate: 0.0,
            ..economic_parameters
        };
        let outcome = evaluate(&entity, &params);
        assert_approx_eq!(
            f64,
            outcome.npv,
            -outcome.investment + 20.0 * outcome.net_profit,
            epsilon = 1e-6
        );
    }
}
