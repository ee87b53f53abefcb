//! Presentation of valuation results.
//!
//! The engine hands back raw floats; this module decides what they mean
//! for display. Rounding happens here and nowhere else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ValuationInputs, ValuationResult};

/// Shown in place of a figure that has no finite value.
pub const NOT_AVAILABLE: &str = "n/a";

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// How money is labelled in summaries and term sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO code, e.g. "NZD".
    pub code: String,
    pub symbol: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "NZD".to_string(),
            symbol: "$".to_string(),
        }
    }
}

/// Format to the nearest whole unit with thousands separators.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    // Display of an integral f64 is plain digits at any magnitude.
    let digits = format!("{}", rounded.abs());
    format!("{sign}{symbol}{}", group_thousands(&digits))
}

/// Exact amount to the cent, grouped like `format_currency`.
pub fn format_amount(value: Decimal, symbol: &str) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}{symbol}{}.{cents}", group_thousands(whole))
}

/// Short axis-label form: `$1.2M`, `$133k`, `$950`.
pub fn abbreviate_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let abs = value.abs();
    let sign = if value < 0.0 && abs >= 0.5 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}{symbol}{:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}{symbol}{:.0}k", abs / 1_000.0)
    } else {
        format!("{sign}{symbol}{:.0}", abs)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Breakeven classification
// ---------------------------------------------------------------------------

/// What a raw breakeven value means for the lessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BreakevenOutcome {
    /// The lines cross at a non-negative stakes volume. Below it the lease
    /// pays more; above it keeping the stake pays more.
    Crossing { total_stakes: f64, owner_share: f64 },
    /// The crossing is at negative volume: leasing pays more at every
    /// achievable stakes volume.
    LeaseAlwaysAhead { total_stakes: f64 },
    /// Parallel lines (or 0/0); there is no finite breakeven.
    NoFiniteBreakeven,
}

impl BreakevenOutcome {
    pub fn classify(total_stakes: f64, owner_share: f64) -> Self {
        if !total_stakes.is_finite() || !owner_share.is_finite() {
            BreakevenOutcome::NoFiniteBreakeven
        } else if total_stakes < 0.0 {
            BreakevenOutcome::LeaseAlwaysAhead { total_stakes }
        } else {
            BreakevenOutcome::Crossing {
                total_stakes,
                owner_share,
            }
        }
    }

    pub fn is_crossing(&self) -> bool {
        matches!(self, BreakevenOutcome::Crossing { .. })
    }

    /// One-line human description.
    pub fn describe(&self, symbol: &str) -> String {
        match self {
            BreakevenOutcome::Crossing {
                total_stakes,
                owner_share,
            } => format!(
                "{} total stakes won ({} owner share)",
                format_currency(*total_stakes, symbol),
                format_currency(*owner_share, symbol),
            ),
            BreakevenOutcome::LeaseAlwaysAhead { .. } => {
                "Lease is ahead at every stakes volume".to_string()
            }
            BreakevenOutcome::NoFiniteBreakeven => "No finite breakeven".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Display-ready figures for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub currency: String,
    pub upfront_income: String,
    pub syndicator_breakeven: BreakevenOutcome,
    pub syndicator_breakeven_label: String,
    pub investor_breakeven: BreakevenOutcome,
    pub investor_breakeven_label: String,
    pub return_with_lease: String,
    pub return_without_lease: String,
    /// Axis label for the right edge of the chart; `n/a` when the chart
    /// has no finite domain.
    pub chart_axis_max: String,
}

impl ValuationSummary {
    pub fn from_result(result: &ValuationResult, currency: &CurrencyFormat) -> Self {
        let symbol = currency.symbol.as_str();
        let syndicator = BreakevenOutcome::classify(
            result.syndicator_breakeven_total_stakes,
            result.syndicator_breakeven_owner_share,
        );
        let investor = BreakevenOutcome::classify(
            result.investor_breakeven_total_stakes,
            result.investor_breakeven_owner_share,
        );
        // Returns at a negative crossing are meaningless to show.
        let (with_lease, without_lease) = if syndicator.is_crossing() {
            (
                format_currency(result.return_with_lease, symbol),
                format_currency(result.return_without_lease, symbol),
            )
        } else {
            (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string())
        };

        Self {
            currency: currency.code.clone(),
            upfront_income: format_currency(result.upfront_income, symbol),
            syndicator_breakeven_label: syndicator.describe(symbol),
            syndicator_breakeven: syndicator,
            investor_breakeven_label: investor.describe(symbol),
            investor_breakeven: investor,
            return_with_lease: with_lease,
            return_without_lease: without_lease,
            chart_axis_max: abbreviate_currency(result.chart_domain_max, symbol),
        }
    }
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Parse a numeric form field. Empty or unparseable text is zero.
pub fn parse_lenient(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// The valuation form as submitted: five optional text fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationForm {
    pub price_per_one_percent_per_year: Option<String>,
    pub stake_percent: Option<String>,
    pub duration_months: Option<String>,
    pub owner_revenue_share_percent: Option<String>,
    pub deduction_percent: Option<String>,
}

impl ValuationForm {
    pub fn to_inputs(&self) -> ValuationInputs {
        let field = |v: &Option<String>| v.as_deref().map(parse_lenient).unwrap_or(0.0);
        ValuationInputs {
            price_per_one_percent_per_year: field(&self.price_per_one_percent_per_year),
            stake_percent: field(&self.stake_percent),
            duration_months: field(&self.duration_months),
            owner_revenue_share_percent: field(&self.owner_revenue_share_percent),
            deduction_percent: field(&self.deduction_percent),
        }
    }
}
