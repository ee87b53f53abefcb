//! Shared types for PADDOCK.
//!
//! The valuation data model and the crate-wide error type. Valuation,
//! onboarding, storage and the HTTP server all depend on these, so this
//! module depends on nothing else in the crate except the draft error.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::onboarding::DraftError;

// ---------------------------------------------------------------------------
// Valuation inputs
// ---------------------------------------------------------------------------

/// The five economic parameters of a lease, as entered by a syndicator.
///
/// Percentages are 0–100 numbers, not fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInputs {
    /// Annual price charged to lease 1% of the horse.
    pub price_per_one_percent_per_year: f64,
    /// Percentage of the horse being leased.
    pub stake_percent: f64,
    /// Lease duration in months.
    pub duration_months: f64,
    /// Percentage of winnings the lessor keeps under the lease.
    pub owner_revenue_share_percent: f64,
    /// Flat regulatory/levy deduction applied to winnings.
    pub deduction_percent: f64,
}

impl fmt::Display for ValuationInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% for {} months @ {:.2}/1%/yr | owner share {}% | deduction {}%",
            self.stake_percent,
            self.duration_months,
            self.price_per_one_percent_per_year,
            self.owner_revenue_share_percent,
            self.deduction_percent,
        )
    }
}

/// Names of the valuation input fields, as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    PricePerOnePercentPerYear,
    StakePercent,
    DurationMonths,
    OwnerRevenueSharePercent,
    DeductionPercent,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::PricePerOnePercentPerYear => "pricePerOnePercentPerYear",
            InputField::StakePercent => "stakePercent",
            InputField::DurationMonths => "durationMonths",
            InputField::OwnerRevenueSharePercent => "ownerRevenueSharePercent",
            InputField::DeductionPercent => "deductionPercent",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Valuation result
// ---------------------------------------------------------------------------

/// One sample of the three revenue lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub total_stakes: f64,
    /// Lessor's stake-proportional slice of `total_stakes`.
    pub owner_share: f64,
    pub lease_revenue_gross: f64,
    pub lease_revenue_net: f64,
    pub no_lease_revenue: f64,
}

/// Everything derived from one set of valid inputs.
///
/// Breakeven fields are raw engine output: they may be negative or
/// non-finite. Use `valuation::report::BreakevenOutcome` to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub upfront_income: f64,
    pub syndicator_breakeven_total_stakes: f64,
    pub syndicator_breakeven_owner_share: f64,
    pub investor_breakeven_total_stakes: f64,
    pub investor_breakeven_owner_share: f64,
    /// Lessor return with the lease, at the syndicator breakeven.
    pub return_with_lease: f64,
    /// Lessor return without the lease, at the syndicator breakeven.
    pub return_without_lease: f64,
    pub chart_domain_max: f64,
    pub curve_points: Vec<CurvePoint>,
}

impl fmt::Display for ValuationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upfront={:.2} | syndicator breakeven={:.2} | investor breakeven={:.2} | {} samples",
            self.upfront_income,
            self.syndicator_breakeven_total_stakes,
            self.investor_breakeven_total_stakes,
            self.curve_points.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A rejected input: which field, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn for_input(field: InputField, message: impl Into<String>) -> Self {
        Self::new(field.as_str(), message)
    }
}

/// Domain-specific error types for PADDOCK.
#[derive(Debug, thiserror::Error)]
pub enum PaddockError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Draft not found: {0}")]
    DraftNotFound(Uuid),

    #[error("Studio is not configured")]
    StudioUnavailable,

    #[error("Studio error: {0}")]
    Studio(String),

    #[error("Studio job {job_id} not complete after {waited_secs}s (last status {last_status})")]
    StudioTimeout {
        job_id: String,
        waited_secs: u64,
        last_status: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
