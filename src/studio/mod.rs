//! Studio: the external transcription/enrichment job service.
//!
//! Media submitted to Studio moves through
//! `NEW → TRANSCRIBING → ENRICHING → REFINING → COMPLETE`, exposing partial
//! results along the way. We only read job state; submission happens
//! elsewhere.

pub mod client;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::types::PaddockError;

// ---------------------------------------------------------------------------
// Job shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    New,
    Transcribing,
    Enriching,
    Refining,
    Complete,
}

impl JobStatus {
    /// Zero-based position in the pipeline.
    pub fn stage(&self) -> u8 {
        match self {
            JobStatus::New => 0,
            JobStatus::Transcribing => 1,
            JobStatus::Enriching => 2,
            JobStatus::Refining => 3,
            JobStatus::Complete => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == JobStatus::Complete
    }

    /// The status that follows this one, if any.
    pub fn next(&self) -> Option<JobStatus> {
        match self {
            JobStatus::New => Some(JobStatus::Transcribing),
            JobStatus::Transcribing => Some(JobStatus::Enriching),
            JobStatus::Enriching => Some(JobStatus::Refining),
            JobStatus::Refining => Some(JobStatus::Complete),
            JobStatus::Complete => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::New => write!(f, "NEW"),
            JobStatus::Transcribing => write!(f, "TRANSCRIBING"),
            JobStatus::Enriching => write!(f, "ENRICHING"),
            JobStatus::Refining => write!(f, "REFINING"),
            JobStatus::Complete => write!(f, "COMPLETE"),
        }
    }
}

/// A job as last reported by Studio. Result fields fill in as the job
/// advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub enrichment: Option<serde_json::Value>,
    #[serde(default)]
    pub refined: Option<String>,
}

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Read access to Studio jobs.
#[async_trait]
pub trait StudioJobs: Send + Sync {
    async fn fetch_job(&self, job_id: &str) -> Result<JobSnapshot>;
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Polls a job until it completes or the timeout passes.
#[derive(Debug, Clone)]
pub struct JobPoller {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(15 * 60),
        }
    }
}

impl JobPoller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub async fn wait_for_completion(
        &self,
        jobs: &dyn StudioJobs,
        job_id: &str,
    ) -> Result<JobSnapshot, PaddockError> {
        let started = Instant::now();
        let mut last: Option<JobStatus> = None;

        loop {
            let snapshot = jobs
                .fetch_job(job_id)
                .await
                .map_err(|e| PaddockError::Studio(format!("{e:#}")))?;

            if last != Some(snapshot.status) {
                if let Some(prev) = last {
                    if snapshot.status < prev {
                        warn!(
                            job_id,
                            from = %prev,
                            to = %snapshot.status,
                            "Studio job status went backwards"
                        );
                    }
                }
                info!(job_id, status = %snapshot.status, "Studio job status");
                last = Some(snapshot.status);
            }

            if snapshot.status.is_terminal() {
                return Ok(snapshot);
            }

            let waited = started.elapsed();
            if waited >= self.timeout {
                return Err(PaddockError::StudioTimeout {
                    job_id: job_id.to_string(),
                    waited_secs: waited.as_secs(),
                    last_status: snapshot.status.to_string(),
                });
            }

            // Never sleep past the deadline.
            let pause = self.interval.min(self.timeout.saturating_sub(waited));
            debug!(job_id, status = %snapshot.status, ?pause, "Waiting for Studio job");
            tokio::time::sleep(pause).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
