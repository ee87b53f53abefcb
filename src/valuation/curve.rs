//! Chart sampling for the three revenue lines.

use super::breakeven::{owner_share, Rates};
use crate::types::CurvePoint;

/// Samples per curve, endpoints included.
pub const CURVE_SAMPLES: usize = 51;

/// Evaluate the three revenue lines at one total-stakes value.
pub fn point_at(
    stake_percent: f64,
    upfront_income: f64,
    rates: &Rates,
    total_stakes: f64,
) -> CurvePoint {
    let share = owner_share(stake_percent, total_stakes);
    CurvePoint {
        total_stakes,
        owner_share: share,
        lease_revenue_gross: upfront_income + (rates.gross_owner_share / 100.0) * share,
        lease_revenue_net: upfront_income + (rates.net_owner_share / 100.0) * share,
        no_lease_revenue: (rates.no_lease_rate / 100.0) * share,
    }
}

/// Evenly spaced samples over `[0, domain_max]`.
pub fn sample(
    stake_percent: f64,
    upfront_income: f64,
    rates: &Rates,
    domain_max: f64,
) -> Vec<CurvePoint> {
    let steps = (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let t = (i as f64 / steps) * domain_max;
            point_at(stake_percent, upfront_income, rates, t)
        })
        .collect()
}
