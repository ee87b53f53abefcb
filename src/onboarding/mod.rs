//! Onboarding wizard: profile → horse → lease → term sheet.
//!
//! A `DraftApplication` carries everything entered so far. Each step
//! validates its payload before merging it, steps must be completed in
//! order, and changing an earlier step discards the generated term sheet.

pub mod steps;
pub mod term_sheet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::records::{Horse, RacingManager, Submission, Syndicator, TermSheetRecord, Trainer};
use crate::types::ValidationError;
use crate::valuation::report::CurrencyFormat;
use steps::{HorseRegistration, LeaseTerms, SyndicatorProfile};
use term_sheet::TermSheet;

// ---------------------------------------------------------------------------
// Steps & errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Profile,
    Horse,
    Lease,
    TermSheet,
    Complete,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Profile => write!(f, "profile"),
            WizardStep::Horse => write!(f, "horse"),
            WizardStep::Lease => write!(f, "lease"),
            WizardStep::TermSheet => write!(f, "term sheet"),
            WizardStep::Complete => write!(f, "submission"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Invalid {0}")]
    Invalid(#[from] ValidationError),

    #[error("Cannot complete {step} before {missing}")]
    StepOutOfOrder { step: WizardStep, missing: WizardStep },
}

// ---------------------------------------------------------------------------
// Draft application
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftApplication {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<SyndicatorProfile>,
    pub horse: Option<HorseRegistration>,
    pub lease: Option<LeaseTerms>,
    pub term_sheet: Option<TermSheet>,
}

impl Default for DraftApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftApplication {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            profile: None,
            horse: None,
            lease: None,
            term_sheet: None,
        }
    }

    /// The first step still to be completed.
    pub fn next_step(&self) -> WizardStep {
        if self.profile.is_none() {
            WizardStep::Profile
        } else if self.horse.is_none() {
            WizardStep::Horse
        } else if self.lease.is_none() {
            WizardStep::Lease
        } else if self.term_sheet.is_none() {
            WizardStep::TermSheet
        } else {
            WizardStep::Complete
        }
    }

    pub fn apply_profile(&mut self, profile: SyndicatorProfile) -> Result<(), DraftError> {
        profile.validate()?;
        self.profile = Some(profile);
        self.touch(WizardStep::Profile);
        Ok(())
    }

    pub fn apply_horse(&mut self, horse: HorseRegistration) -> Result<(), DraftError> {
        self.require(WizardStep::Horse)?;
        horse.validate()?;
        self.horse = Some(horse);
        self.touch(WizardStep::Horse);
        Ok(())
    }

    pub fn apply_lease(&mut self, lease: LeaseTerms) -> Result<(), DraftError> {
        self.require(WizardStep::Lease)?;
        lease.validate()?;
        self.lease = Some(lease);
        self.touch(WizardStep::Lease);
        Ok(())
    }

    /// Run the valuation on the lease terms and store the resulting sheet.
    pub fn generate_term_sheet(
        &mut self,
        currency: &CurrencyFormat,
    ) -> Result<&TermSheet, DraftError> {
        let (profile, horse, lease) = match (&self.profile, &self.horse, &self.lease) {
            (Some(p), Some(h), Some(l)) => (p, h, l),
            _ => {
                return Err(DraftError::StepOutOfOrder {
                    step: WizardStep::TermSheet,
                    missing: self.next_step(),
                })
            }
        };
        let sheet = TermSheet::build(self.id, profile, horse, lease, currency)?;
        info!(
            draft_id = %self.id,
            reference = %sheet.reference,
            upfront_fee = %sheet.upfront_fee,
            "Term sheet generated"
        );
        self.updated_at = Utc::now();
        Ok(self.term_sheet.insert(sheet))
    }

    /// The records to write once the application is complete.
    pub fn submission(&self) -> Result<Submission, DraftError> {
        let (profile, horse, lease, sheet) =
            match (&self.profile, &self.horse, &self.lease, &self.term_sheet) {
                (Some(p), Some(h), Some(l), Some(s)) => (p, h, l, s),
                _ => {
                    return Err(DraftError::StepOutOfOrder {
                        step: WizardStep::Complete,
                        missing: self.next_step(),
                    })
                }
            };

        let syndicator = Syndicator {
            id: Uuid::new_v4(),
            name: profile.name.clone(),
            business_name: profile.business_name.clone(),
            email: profile.email.trim().to_string(),
            phone: profile.phone.clone(),
            region: profile.region.clone(),
        };
        let trainer = Trainer {
            id: Uuid::new_v4(),
            name: horse.trainer.name.clone(),
            email: horse.trainer.email.clone(),
            phone: horse.trainer.phone.clone(),
        };
        let racing_manager = horse.racing_manager.as_ref().map(|m| RacingManager {
            id: Uuid::new_v4(),
            name: m.name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone(),
        });
        let horse_record = Horse {
            id: Uuid::new_v4(),
            syndicator_id: syndicator.id,
            name: horse.name.clone(),
            foaling_year: horse.foaling_year,
            sex: horse.sex,
            sire: horse.sire.clone(),
            dam: horse.dam.clone(),
            trainer_id: trainer.id,
            racing_manager_id: racing_manager.as_ref().map(|m| m.id),
        };
        let term_sheet = TermSheetRecord {
            id: Uuid::new_v4(),
            syndicator_id: syndicator.id,
            horse_id: horse_record.id,
            reference: sheet.reference.clone(),
            stake_percent: lease.stake_percent,
            duration_months: lease.duration_months,
            commencement: sheet.commencement,
            expiry: sheet.expiry,
            price_per_one_percent_per_year: lease.price_per_one_percent_per_year,
            owner_revenue_share_percent: lease.owner_revenue_share_percent,
            deduction_percent: lease.deduction_percent,
            upfront_fee: sheet.upfront_fee,
            created_at: sheet.generated_at,
        };

        Ok(Submission {
            syndicator,
            trainer,
            racing_manager,
            horse: horse_record,
            term_sheet,
        })
    }

    /// Fail if any step before `step` is still missing.
    fn require(&self, step: WizardStep) -> Result<(), DraftError> {
        let next = self.next_step();
        if next < step {
            Err(DraftError::StepOutOfOrder { step, missing: next })
        } else {
            Ok(())
        }
    }

    /// Record an edit. The term sheet no longer matches what was entered.
    fn touch(&mut self, step: WizardStep) {
        if self.term_sheet.take().is_some() {
            debug!(draft_id = %self.id, %step, "Term sheet discarded after edit");
        }
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
