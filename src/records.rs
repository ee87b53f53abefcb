//! Canonical record shapes exchanged with the hosted record store.
//!
//! The store itself is external; these are the rows we write and read.
//! The owning party is always `syndicator_id`. Rows written before the
//! owner→syndicator rename still carry `owner_id`, which is accepted on
//! read and never written.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::onboarding::steps::HorseSex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syndicator {
    pub id: Uuid,
    pub name: String,
    pub business_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacingManager {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: Uuid,
    #[serde(alias = "owner_id")]
    pub syndicator_id: Uuid,
    pub name: String,
    pub foaling_year: i32,
    pub sex: HorseSex,
    pub sire: String,
    pub dam: String,
    pub trainer_id: Uuid,
    pub racing_manager_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSheetRecord {
    pub id: Uuid,
    #[serde(alias = "owner_id")]
    pub syndicator_id: Uuid,
    pub horse_id: Uuid,
    pub reference: String,
    pub stake_percent: Decimal,
    pub duration_months: u32,
    pub commencement: NaiveDate,
    pub expiry: NaiveDate,
    pub price_per_one_percent_per_year: Decimal,
    pub owner_revenue_share_percent: Decimal,
    pub deduction_percent: Decimal,
    pub upfront_fee: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Everything a completed application writes to the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub syndicator: Syndicator,
    pub trainer: Trainer,
    pub racing_manager: Option<RacingManager>,
    pub horse: Horse,
    pub term_sheet: TermSheetRecord,
}
