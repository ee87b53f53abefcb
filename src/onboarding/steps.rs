//! Payloads for each wizard step, with their validation rules.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ValidationError, ValuationInputs};
use crate::valuation;

/// Earliest foaling year accepted for a horse still worth leasing.
const MIN_FOALING_YEAR: i32 = 1990;

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be blank"))
    } else {
        Ok(())
    }
}

/// Structural check only: one `@`, something before it, a dot after it.
fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(field, format!("'{value}' is not a valid email address")))
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Step 1: who is syndicating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyndicatorProfile {
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl SyndicatorProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_email("email", &self.email)
    }
}

// ---------------------------------------------------------------------------
// Horse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorseSex {
    Colt,
    Filly,
    Gelding,
    Mare,
    Stallion,
}

impl fmt::Display for HorseSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorseSex::Colt => write!(f, "Colt"),
            HorseSex::Filly => write!(f, "Filly"),
            HorseSex::Gelding => write!(f, "Gelding"),
            HorseSex::Mare => write!(f, "Mare"),
            HorseSex::Stallion => write!(f, "Stallion"),
        }
    }
}

/// A trainer or racing manager as entered on the horse step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Contact {
    fn validate(&self, prefix: &str) -> Result<(), ValidationError> {
        require_text(&format!("{prefix}.name"), &self.name)?;
        if let Some(email) = &self.email {
            require_email(&format!("{prefix}.email"), email)?;
        }
        Ok(())
    }
}

/// Step 2: the horse being syndicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseRegistration {
    pub name: String,
    pub foaling_year: i32,
    pub sex: HorseSex,
    pub sire: String,
    pub dam: String,
    pub trainer: Contact,
    #[serde(default)]
    pub racing_manager: Option<Contact>,
}

impl HorseRegistration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        let this_year = Utc::now().year();
        if self.foaling_year < MIN_FOALING_YEAR || self.foaling_year > this_year {
            return Err(ValidationError::new(
                "foalingYear",
                format!("must be between {MIN_FOALING_YEAR} and {this_year}"),
            ));
        }
        require_text("sire", &self.sire)?;
        require_text("dam", &self.dam)?;
        self.trainer.validate("trainer")?;
        if let Some(manager) = &self.racing_manager {
            manager.validate("racingManager")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

/// Who signs for the lessor, and that they confirmed they may.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningAuthority {
    pub signatory_name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub confirmed: bool,
}

/// Step 3: lease economics. Money and percentages are exact decimals;
/// they become floats only when handed to the valuation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseTerms {
    pub price_per_one_percent_per_year: Decimal,
    pub stake_percent: Decimal,
    pub duration_months: u32,
    pub owner_revenue_share_percent: Decimal,
    pub deduction_percent: Decimal,
    pub commencement: NaiveDate,
    pub authority: SigningAuthority,
}

impl LeaseTerms {
    /// Engine inputs for these terms. A decimal that does not fit an
    /// `f64` becomes NaN, which validation then rejects.
    pub fn valuation_inputs(&self) -> ValuationInputs {
        let float = |d: &Decimal| d.to_f64().unwrap_or(f64::NAN);
        ValuationInputs {
            price_per_one_percent_per_year: float(&self.price_per_one_percent_per_year),
            stake_percent: float(&self.stake_percent),
            duration_months: f64::from(self.duration_months),
            owner_revenue_share_percent: float(&self.owner_revenue_share_percent),
            deduction_percent: float(&self.deduction_percent),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        valuation::validate(&self.valuation_inputs())?;
        require_text("authority.signatoryName", &self.authority.signatory_name)?;
        if !self.authority.confirmed {
            return Err(ValidationError::new(
                "authority.confirmed",
                "signing authority must be confirmed",
            ));
        }
        Ok(())
    }
}
