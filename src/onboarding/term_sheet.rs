//! Term sheet generation.
//!
//! A term sheet fixes the lease economics, dates and parties in one
//! document and records what the valuation engine made of them.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::steps::{HorseRegistration, LeaseTerms, SyndicatorProfile};
use crate::types::{InputField, ValidationError};
use crate::valuation::{
    self,
    report::{format_amount, BreakevenOutcome, CurrencyFormat},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSheet {
    pub reference: String,
    pub generated_at: DateTime<Utc>,
    pub currency: CurrencyFormat,
    pub syndicator_name: String,
    pub signatory_name: String,
    pub horse_name: String,
    pub trainer_name: String,
    pub stake_percent: Decimal,
    pub duration_months: u32,
    pub commencement: NaiveDate,
    pub expiry: NaiveDate,
    pub price_per_one_percent_per_year: Decimal,
    pub owner_revenue_share_percent: Decimal,
    pub deduction_percent: Decimal,
    /// Upfront lease fee, rounded to cents.
    pub upfront_fee: Decimal,
    pub syndicator_breakeven: BreakevenOutcome,
    pub investor_breakeven: BreakevenOutcome,
}

impl TermSheet {
    pub fn build(
        draft_id: Uuid,
        profile: &SyndicatorProfile,
        horse: &HorseRegistration,
        lease: &LeaseTerms,
        currency: &CurrencyFormat,
    ) -> Result<Self, ValidationError> {
        let result = valuation::evaluate(&lease.valuation_inputs())?;

        let expiry = lease
            .commencement
            .checked_add_months(Months::new(lease.duration_months))
            .ok_or_else(|| {
                ValidationError::for_input(
                    InputField::DurationMonths,
                    "lease ends out of calendar range",
                )
            })?;

        Ok(Self {
            reference: reference_for(draft_id),
            generated_at: Utc::now(),
            currency: currency.clone(),
            syndicator_name: profile
                .business_name
                .clone()
                .unwrap_or_else(|| profile.name.clone()),
            signatory_name: lease.authority.signatory_name.clone(),
            horse_name: horse.name.clone(),
            trainer_name: horse.trainer.name.clone(),
            stake_percent: lease.stake_percent,
            duration_months: lease.duration_months,
            commencement: lease.commencement,
            expiry,
            price_per_one_percent_per_year: lease.price_per_one_percent_per_year,
            owner_revenue_share_percent: lease.owner_revenue_share_percent,
            deduction_percent: lease.deduction_percent,
            upfront_fee: upfront_fee(lease)?,
            syndicator_breakeven: BreakevenOutcome::classify(
                result.syndicator_breakeven_total_stakes,
                result.syndicator_breakeven_owner_share,
            ),
            investor_breakeven: BreakevenOutcome::classify(
                result.investor_breakeven_total_stakes,
                result.investor_breakeven_owner_share,
            ),
        })
    }
}

/// `TS-` plus the first eight hex digits of the draft id.
pub fn reference_for(draft_id: Uuid) -> String {
    let hex = draft_id.simple().to_string();
    format!("TS-{}", hex[..8].to_ascii_uppercase())
}

/// Same formula as the engine's upfront income, in exact decimal.
fn upfront_fee(lease: &LeaseTerms) -> Result<Decimal, ValidationError> {
    lease
        .price_per_one_percent_per_year
        .checked_mul(Decimal::from(lease.duration_months))
        .and_then(|v| v.checked_mul(lease.stake_percent))
        .and_then(|v| v.checked_div(dec!(12)))
        .map(|v| v.round_dp(2))
        .ok_or_else(|| {
            ValidationError::for_input(
                InputField::PricePerOnePercentPerYear,
                "upfront fee overflows",
            )
        })
}

impl fmt::Display for TermSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.currency.symbol.as_str();
        writeln!(f, "TERM SHEET {}", self.reference)?;
        writeln!(f, "Generated {}", self.generated_at.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;
        writeln!(
            f,
            "Lessor:           {} (signed by {})",
            self.syndicator_name, self.signatory_name
        )?;
        writeln!(f, "Horse:            {} (trainer {})", self.horse_name, self.trainer_name)?;
        writeln!(f, "Stake leased:     {}%", self.stake_percent)?;
        writeln!(
            f,
            "Term:             {} months, {} to {}",
            self.duration_months, self.commencement, self.expiry
        )?;
        writeln!(
            f,
            "Price:            {} per 1% per year ({})",
            format_amount(self.price_per_one_percent_per_year, symbol),
            self.currency.code
        )?;
        writeln!(f, "Upfront fee:      {}", format_amount(self.upfront_fee, symbol))?;
        writeln!(f, "Owner share:      {}% of winnings", self.owner_revenue_share_percent)?;
        writeln!(f, "Deduction:        {}%", self.deduction_percent)?;
        writeln!(f)?;
        writeln!(f, "Syndicator breakeven: {}", self.syndicator_breakeven.describe(symbol))?;
        write!(f, "Investor breakeven:   {}", self.investor_breakeven.describe(symbol))
    }
}
