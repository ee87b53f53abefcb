//! Breakeven algebra.
//!
//! With `share = (stake / 100) * total_stakes`, lease income is
//! `upfront + (lease_rate / 100) * share` and no-lease income is
//! `(no_lease_rate / 100) * share`. The breakeven is where the two lines
//! meet. Nothing here guards against parallel lines: the division is left
//! to produce ±∞ or NaN.

use crate::types::ValuationInputs;

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Percentages of winnings each strategy pays the lessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// Owner revenue share before the deduction.
    pub gross_owner_share: f64,
    /// Owner revenue share after the deduction, floored at zero.
    pub net_owner_share: f64,
    /// What the lessor keeps without a lease, after the deduction.
    pub no_lease_rate: f64,
}

impl Rates {
    pub fn new(owner_revenue_share_percent: f64, deduction_percent: f64) -> Self {
        Self {
            gross_owner_share: owner_revenue_share_percent,
            net_owner_share: (owner_revenue_share_percent - deduction_percent).max(0.0),
            no_lease_rate: (100.0 - deduction_percent).max(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Lease duration in years.
pub fn lease_years(duration_months: f64) -> f64 {
    duration_months / 12.0
}

/// Guaranteed lease fee, independent of race results.
///
/// `stake_percent` counts 1% units here (10% leased multiplies by 10),
/// unlike the owner-share terms which scale by `stake_percent / 100`.
pub fn upfront_income(inputs: &ValuationInputs) -> f64 {
    inputs.price_per_one_percent_per_year
        * lease_years(inputs.duration_months)
        * inputs.stake_percent
}

/// Total stakes won at which lease income equals no-lease income.
///
/// Negative when `lease_rate > no_lease_rate`. Non-finite when the rates
/// are equal.
pub fn breakeven_total_stakes(
    price_per_one_percent_per_year: f64,
    duration_months: f64,
    lease_rate: f64,
    no_lease_rate: f64,
) -> f64 {
    (100.0 * price_per_one_percent_per_year * lease_years(duration_months))
        / ((no_lease_rate - lease_rate) / 100.0)
}

/// The lessor's slice of `total_stakes`.
pub fn owner_share(stake_percent: f64, total_stakes: f64) -> f64 {
    (stake_percent / 100.0) * total_stakes
}
