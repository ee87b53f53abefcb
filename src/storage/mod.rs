//! Persistence layer for onboarding drafts.
//!
//! One JSON file per draft under the configured directory. `DraftStore`
//! keeps an in-memory cache in front of the files so repeated reads of an
//! active draft don't touch disk.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::onboarding::{DraftApplication, DraftError};
use crate::types::PaddockError;

fn draft_path(dir: &Path, id: Uuid) -> PathBuf {
    dir.join(format!("{id}.json"))
}

/// Save a draft to `<dir>/<id>.json`.
pub fn save_draft(draft: &DraftApplication, dir: &Path) -> Result<()> {
    let path = draft_path(dir, draft.id);
    let json = serde_json::to_string_pretty(draft).context("Failed to serialise draft")?;

    std::fs::write(&path, &json)
        .with_context(|| format!("Failed to write draft to {}", path.display()))?;

    debug!(path = %path.display(), next_step = %draft.next_step(), "Draft saved");
    Ok(())
}

/// Load a draft. Returns None if it was never saved.
pub fn load_draft(id: Uuid, dir: &Path) -> Result<Option<DraftApplication>> {
    let path = draft_path(dir, id);

    if !path.exists() {
        debug!(path = %path.display(), "No saved draft");
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read draft from {}", path.display()))?;

    let draft: DraftApplication = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse draft from {}", path.display()))?;

    debug!(path = %path.display(), next_step = %draft.next_step(), "Draft loaded from disk");
    Ok(Some(draft))
}

/// Delete a draft file. Deleting a missing draft is not an error.
pub fn delete_draft(id: Uuid, dir: &Path) -> Result<()> {
    let path = draft_path(dir, id);
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete draft file {}", path.display()))?;
    }
    Ok(())
}

fn storage_error(e: anyhow::Error) -> PaddockError {
    PaddockError::Storage(format!("{e:#}"))
}

/// Run file I/O on the blocking pool.
async fn blocking<T, F>(task: F) -> Result<T, PaddockError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PaddockError::Storage(format!("Storage task failed: {e}")))?
        .map_err(storage_error)
}

// ---------------------------------------------------------------------------
// Draft store
// ---------------------------------------------------------------------------

/// Drafts kept in memory at once. Disk is authoritative; evicted drafts are
/// reloaded on the next read.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Drafts on disk with a bounded write-through cache.
pub struct DraftStore {
    dir: PathBuf,
    capacity: usize,
    cache: RwLock<HashMap<Uuid, DraftApplication>>,
}

impl DraftStore {
    /// Open (creating if needed) the drafts directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_capacity(dir, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(dir: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create drafts directory {}", dir.display()))?;
        info!(dir = %dir.display(), capacity, "Draft store opened");
        Ok(Self {
            dir,
            capacity: capacity.max(1),
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Start and persist a new, empty draft.
    pub async fn create(&self) -> Result<DraftApplication, PaddockError> {
        let draft = DraftApplication::new();
        let mut cache = self.cache.write().await;
        self.save(&draft).await?;
        self.remember(&mut cache, draft.clone());
        info!(draft_id = %draft.id, "Draft created");
        Ok(draft)
    }

    pub async fn get(&self, id: Uuid) -> Result<DraftApplication, PaddockError> {
        if let Some(draft) = self.cache.read().await.get(&id) {
            return Ok(draft.clone());
        }
        let mut cache = self.cache.write().await;
        let draft = self.load(id).await?;
        self.remember(&mut cache, draft.clone());
        Ok(draft)
    }

    /// Apply `edit` to a draft and persist the result.
    ///
    /// Runs under the write lock, so concurrent edits of the same draft are
    /// serialised. Nothing is saved when `edit` fails.
    pub async fn update<T>(
        &self,
        id: Uuid,
        edit: impl FnOnce(&mut DraftApplication) -> Result<T, DraftError>,
    ) -> Result<T, PaddockError> {
        let mut cache = self.cache.write().await;
        let cached = cache.get(&id).cloned();
        let mut draft = match cached {
            Some(d) => d,
            None => self.load(id).await?,
        };

        let out = edit(&mut draft)?;
        self.save(&draft).await?;
        self.remember(&mut cache, draft);
        Ok(out)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), PaddockError> {
        let mut cache = self.cache.write().await;
        cache.remove(&id);
        let dir = self.dir.clone();
        blocking(move || delete_draft(id, &dir)).await
    }

    async fn save(&self, draft: &DraftApplication) -> Result<(), PaddockError> {
        let dir = self.dir.clone();
        let draft = draft.clone();
        blocking(move || save_draft(&draft, &dir)).await
    }

    async fn load(&self, id: Uuid) -> Result<DraftApplication, PaddockError> {
        let dir = self.dir.clone();
        blocking(move || load_draft(id, &dir))
            .await?
            .ok_or(PaddockError::DraftNotFound(id))
    }

    /// Cache `draft`, evicting the least recently updated entry when full.
    fn remember(&self, cache: &mut HashMap<Uuid, DraftApplication>, draft: DraftApplication) {
        if !cache.contains_key(&draft.id) && cache.len() >= self.capacity {
            let oldest = cache
                .values()
                .min_by_key(|d| d.updated_at)
                .map(|d| d.id);
            if let Some(evicted) = oldest {
                cache.remove(&evicted);
                debug!(draft_id = %evicted, "Draft evicted from cache");
            }
        }
        cache.insert(draft.id, draft);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
