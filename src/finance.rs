//! General functions related to finance.

/// Calculates the sum of discount factors over an asset's lifetime.
///
/// Cash flows are assumed to occur at the end of each year, so the first year is discounted once.
/// With a discount rate of zero, this is simply the lifetime.
///
/// # Arguments
///
/// * `discount_rate` - Annual discount rate, as a fraction
/// * `lifetime` - Number of years over which the cash flow occurs
pub fn annuity_factor(discount_rate: f64, lifetime: u32) -> f64 {
    let lifetime = f64::from(lifetime);
    if discount_rate == 0.0 {
        return lifetime;
    }

    (1.0 - (1.0 + discount_rate).powf(-lifetime)) / discount_rate
}

/// Calculates the net present value of a constant annual cash flow following an upfront investment.
///
/// The cash flow may be negative, in which case so is the result.
pub fn net_present_value(
    investment: f64,
    annual_cash_flow: f64,
    discount_rate: f64,
    lifetime: u32,
) -> f64 {
    -investment + annual_cash_flow * annuity_factor(discount_rate, lifetime)
}

/// Calculates the simple payback period in years.
///
/// Returns `None` if the payback is undefined, i.e. if there is no investment to recover or if
/// the annual net profit is not positive.
pub fn simple_payback(investment: f64, annual_net_profit: f64) -> Option<f64> {
    (investment > 0.0 && annual_net_profit > 0.0).then(|| investment / annual_net_profit)
}
