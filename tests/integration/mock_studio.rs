//! Mock Studio for integration testing.
//!
//! Serves scripted job progress from memory. Each fetch advances the job
//! one step through its script and records the call.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use paddock::studio::{JobSnapshot, JobStatus, StudioJobs};

pub struct MockStudio {
    script: Mutex<Vec<JobStatus>>,
    fetches: Arc<Mutex<Vec<String>>>,
    /// If set, every fetch fails with this message.
    force_error: Mutex<Option<String>>,
}

impl MockStudio {
    /// A job that walks every status from `NEW` to `COMPLETE`.
    pub fn full_pipeline() -> Self {
        Self::scripted(vec![
            JobStatus::New,
            JobStatus::Transcribing,
            JobStatus::Enriching,
            JobStatus::Refining,
            JobStatus::Complete,
        ])
    }

    /// Steps through `script`, then repeats its last entry forever.
    pub fn scripted(script: Vec<JobStatus>) -> Self {
        Self {
            script: Mutex::new(script),
            fetches: Arc::new(Mutex::new(Vec::new())),
            force_error: Mutex::new(None),
        }
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    fn snapshot(job_id: &str, status: JobStatus) -> JobSnapshot {
        let stage = status.stage();
        JobSnapshot {
            id: job_id.to_string(),
            status,
            transcript: (stage >= 2).then(|| "Gate open, clean jump".to_string()),
            enrichment: (stage >= 3).then(|| serde_json::json!({ "horse": "Paddock Star" })),
            refined: (stage >= 4).then(|| "Paddock Star jumps cleanly".to_string()),
        }
    }
}

#[async_trait]
impl StudioJobs for MockStudio {
    async fn fetch_job(&self, job_id: &str) -> Result<JobSnapshot> {
        self.fetches.lock().unwrap().push(job_id.to_string());
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        let mut script = self.script.lock().unwrap();
        let status = if script.len() > 1 {
            script.remove(0)
        } else {
            *script.first().ok_or_else(|| anyhow!("empty script"))?
        };
        Ok(Self::snapshot(job_id, status))
    }
}
