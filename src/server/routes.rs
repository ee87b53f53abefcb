//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath};
use crate::onboarding::steps::{HorseRegistration, LeaseTerms, SyndicatorProfile};
use crate::onboarding::term_sheet::TermSheet;
use crate::onboarding::{DraftApplication, DraftError, WizardStep};
use crate::records::Submission;
use crate::storage::DraftStore;
use crate::studio::{JobPoller, JobSnapshot, StudioJobs};
use crate::types::{PaddockError, ValuationInputs, ValuationResult};
use crate::valuation::{
    self,
    report::{CurrencyFormat, ValuationForm, ValuationSummary},
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub drafts: DraftStore,
    /// `None` when Studio is disabled in config.
    pub studio: Option<Arc<dyn StudioJobs>>,
    pub poller: JobPoller,
    pub currency: CurrencyFormat,
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    pub result: ValuationResult,
    pub summary: ValuationSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub next_step: WizardStep,
    pub draft: DraftApplication,
}

impl From<DraftApplication> for DraftView {
    fn from(draft: DraftApplication) -> Self {
        Self {
            next_step: draft.next_step(),
            draft,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSheetResponse {
    pub term_sheet: TermSheet,
    /// Plain-text rendering of the sheet.
    pub document: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Maps domain errors onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, error: &str, message: String) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.to_string(),
                field: None,
                message,
            },
        }
    }
}

impl From<PaddockError> for ApiError {
    fn from(e: PaddockError) -> Self {
        let message = e.to_string();
        match e {
            PaddockError::Validation(v) | PaddockError::Draft(DraftError::Invalid(v)) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ErrorBody {
                    error: "validation".to_string(),
                    field: Some(v.field),
                    message: v.message,
                },
            },
            PaddockError::Draft(DraftError::StepOutOfOrder { .. }) => {
                Self::new(StatusCode::CONFLICT, "step_out_of_order", message)
            }
            PaddockError::DraftNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "not_found", message)
            }
            PaddockError::StudioUnavailable => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "studio_unavailable", message)
            }
            PaddockError::Studio(_) => Self::new(StatusCode::BAD_GATEWAY, "studio", message),
            PaddockError::StudioTimeout { .. } => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, "studio_timeout", message)
            }
            PaddockError::Storage(_) => {
                error!(error = %message, "Storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

fn value(
    inputs: &ValuationInputs,
    currency: &CurrencyFormat,
) -> Result<ValuationResponse, ApiError> {
    let result = valuation::evaluate(inputs).map_err(PaddockError::from)?;
    debug!(%inputs, %result, "Valuation served");
    let summary = ValuationSummary::from_result(&result, currency);
    Ok(ValuationResponse { result, summary })
}

/// POST /api/valuation
pub async fn post_valuation(
    State(state): State<AppState>,
    ApiJson(inputs): ApiJson<ValuationInputs>,
) -> Result<Json<ValuationResponse>, ApiError> {
    value(&inputs, &state.currency).map(Json)
}

/// GET /api/valuation
///
/// Form fields as query parameters; blank or garbled fields read as 0.
pub async fn get_valuation(
    State(state): State<AppState>,
    Query(form): Query<ValuationForm>,
) -> Result<Json<ValuationResponse>, ApiError> {
    value(&form.to_inputs(), &state.currency).map(Json)
}

/// POST /api/drafts
pub async fn create_draft(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DraftView>), ApiError> {
    let draft = state.drafts.create().await?;
    Ok((StatusCode::CREATED, Json(draft.into())))
}

/// GET /api/drafts/:id
pub async fn get_draft(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DraftView>, ApiError> {
    Ok(Json(state.drafts.get(id).await?.into()))
}

/// DELETE /api/drafts/:id
pub async fn delete_draft(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    // The store treats unknown ids as already removed.
    state.drafts.get(id).await?;
    state.drafts.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/drafts/:id/profile
pub async fn put_profile(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(profile): ApiJson<SyndicatorProfile>,
) -> Result<Json<DraftView>, ApiError> {
    let draft = state
        .drafts
        .update(id, |d| {
            d.apply_profile(profile)?;
            Ok(d.clone())
        })
        .await?;
    Ok(Json(draft.into()))
}

/// PUT /api/drafts/:id/horse
pub async fn put_horse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(horse): ApiJson<HorseRegistration>,
) -> Result<Json<DraftView>, ApiError> {
    let draft = state
        .drafts
        .update(id, |d| {
            d.apply_horse(horse)?;
            Ok(d.clone())
        })
        .await?;
    Ok(Json(draft.into()))
}

/// PUT /api/drafts/:id/lease
pub async fn put_lease(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(lease): ApiJson<LeaseTerms>,
) -> Result<Json<DraftView>, ApiError> {
    let draft = state
        .drafts
        .update(id, |d| {
            d.apply_lease(lease)?;
            Ok(d.clone())
        })
        .await?;
    Ok(Json(draft.into()))
}

/// POST /api/drafts/:id/term-sheet
pub async fn post_term_sheet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TermSheetResponse>, ApiError> {
    let currency = state.currency.clone();
    let term_sheet = state
        .drafts
        .update(id, move |d| d.generate_term_sheet(&currency).cloned())
        .await?;
    let document = term_sheet.to_string();
    Ok(Json(TermSheetResponse {
        term_sheet,
        document,
    }))
}

/// GET /api/drafts/:id/submission
pub async fn get_submission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Submission>, ApiError> {
    let draft = state.drafts.get(id).await?;
    let submission = draft.submission().map_err(PaddockError::from)?;
    Ok(Json(submission))
}

fn studio(state: &ServerState) -> Result<&dyn StudioJobs, PaddockError> {
    state
        .studio
        .as_deref()
        .ok_or(PaddockError::StudioUnavailable)
}

/// GET /api/studio/jobs/:id
pub async fn get_studio_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> Result<Json<JobSnapshot>, ApiError> {
    let snapshot = studio(&state)?
        .fetch_job(&job_id)
        .await
        .map_err(|e| PaddockError::Studio(format!("{e:#}")))?;
    Ok(Json(snapshot))
}

/// GET /api/studio/jobs/:id/completion
///
/// Blocks until the job completes or the poller times out.
pub async fn await_studio_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> Result<Json<JobSnapshot>, ApiError> {
    let jobs = studio(&state)?;
    let snapshot = state.poller.wait_for_completion(jobs, &job_id).await?;
    Ok(Json(snapshot))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
