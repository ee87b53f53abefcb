//! Lease valuation: breakeven analysis of leasing a stake vs. keeping it.
//!
//! `validate` gates raw input; `compute` turns validated input into the
//! summary figures and the chart series. Both are pure and synchronous, so
//! callers may recompute on every keystroke from as many tasks as they like.

pub mod breakeven;
pub mod curve;
pub mod report;

use tracing::debug;

use crate::types::{InputField, ValidationError, ValuationInputs, ValuationResult};
use breakeven::Rates;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Inputs that passed `validate`. The only way to reach `compute`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidInputs(ValuationInputs);

impl ValidInputs {
    pub fn inputs(&self) -> &ValuationInputs {
        &self.0
    }
}

/// Reject out-of-range input. Values are never clamped.
pub fn validate(inputs: &ValuationInputs) -> Result<ValidInputs, ValidationError> {
    let fields = [
        (InputField::PricePerOnePercentPerYear, inputs.price_per_one_percent_per_year),
        (InputField::StakePercent, inputs.stake_percent),
        (InputField::DurationMonths, inputs.duration_months),
        (InputField::OwnerRevenueSharePercent, inputs.owner_revenue_share_percent),
        (InputField::DeductionPercent, inputs.deduction_percent),
    ];
    // NaN fails every range comparison below, so it has to be caught first.
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ValidationError::for_input(field, "must be a finite number"));
        }
    }

    if inputs.price_per_one_percent_per_year < 0.0 {
        return Err(ValidationError::for_input(
            InputField::PricePerOnePercentPerYear,
            format!("must not be negative, got {}", inputs.price_per_one_percent_per_year),
        ));
    }
    check_percent(InputField::StakePercent, inputs.stake_percent)?;
    if inputs.duration_months < 1.0 {
        return Err(ValidationError::for_input(
            InputField::DurationMonths,
            format!("must be at least 1 month, got {}", inputs.duration_months),
        ));
    }
    check_percent(InputField::OwnerRevenueSharePercent, inputs.owner_revenue_share_percent)?;
    check_percent(InputField::DeductionPercent, inputs.deduction_percent)?;

    Ok(ValidInputs(*inputs))
}

fn check_percent(field: InputField, value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::for_input(
            field,
            format!("must be between 0 and 100, got {value}"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute upfront income, both breakevens, the owner returns at the
/// syndicator breakeven and the sampled revenue curves.
///
/// No rounding is applied. Breakevens are returned as the algebra gives
/// them: negative, infinite or NaN values are passed through.
pub fn compute(valid: &ValidInputs) -> ValuationResult {
    let inputs = valid.inputs();
    let rates = Rates::new(inputs.owner_revenue_share_percent, inputs.deduction_percent);
    let upfront_income = breakeven::upfront_income(inputs);

    // Syndicator: net of deduction on both sides.
    let syndicator_total = breakeven::breakeven_total_stakes(
        inputs.price_per_one_percent_per_year,
        inputs.duration_months,
        rates.net_owner_share,
        rates.no_lease_rate,
    );
    let syndicator_share = breakeven::owner_share(inputs.stake_percent, syndicator_total);

    // Investor: gross owner share on the lease side.
    let investor_total = breakeven::breakeven_total_stakes(
        inputs.price_per_one_percent_per_year,
        inputs.duration_months,
        rates.gross_owner_share,
        rates.no_lease_rate,
    );
    let investor_share = breakeven::owner_share(inputs.stake_percent, investor_total);

    let return_with_lease = upfront_income + (rates.net_owner_share / 100.0) * syndicator_share;
    let return_without_lease = (rates.no_lease_rate / 100.0) * syndicator_share;

    let chart_domain_max = 2.0 * syndicator_total;
    let curve_points =
        curve::sample(inputs.stake_percent, upfront_income, &rates, chart_domain_max);

    debug!(
        upfront_income,
        syndicator_total,
        investor_total,
        net_owner_share = rates.net_owner_share,
        no_lease_rate = rates.no_lease_rate,
        "Valuation computed"
    );

    ValuationResult {
        upfront_income,
        syndicator_breakeven_total_stakes: syndicator_total,
        syndicator_breakeven_owner_share: syndicator_share,
        investor_breakeven_total_stakes: investor_total,
        investor_breakeven_owner_share: investor_share,
        return_with_lease,
        return_without_lease,
        chart_domain_max,
        curve_points,
    }
}

/// `validate` then `compute`.
pub fn evaluate(inputs: &ValuationInputs) -> Result<ValuationResult, ValidationError> {
    let valid = validate(inputs)?;
    Ok(compute(&valid))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
