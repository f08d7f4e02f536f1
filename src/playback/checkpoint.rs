//! Resume-point persistence on teardown.
//!
//! Short views are not worth a resume point, so anything at or below the
//! dead zone is dropped. Saving is fire-and-forget: a lost resume point is
//! logged and otherwise ignored.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_CHECKPOINT_DEAD_ZONE: u32 = 15;

#[derive(thiserror::Error, Debug)]
pub enum CheckpointError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub media_id: u32,
    pub elapsed_seconds: u32,
}

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save_checkpoint(
        &self,
        media_id: u32,
        elapsed_seconds: u32,
    ) -> Result<(), CheckpointError>;
}

/// Accepts ids that are non-negative and fit the backend's 32-bit column.
pub fn valid_media_id(raw: i64) -> Option<u32> {
    if (0..=i32::MAX as i64).contains(&raw) {
        Some(raw as u32)
    } else {
        None
    }
}

/// Parses an identifier supplied as text by the parent view.
pub fn parse_media_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<i64>().ok().and_then(valid_media_id)
}

pub struct CheckpointPersister {
    store: Arc<dyn CheckpointStore>,
    dead_zone: u32,
    saved: Option<mpsc::UnboundedSender<Checkpoint>>,
}

impl fmt::Debug for CheckpointPersister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointPersister")
            .field("dead_zone", &self.dead_zone)
            .field("notifies", &self.saved.is_some())
            .finish()
    }
}

impl CheckpointPersister {
    pub fn new(store: Arc<dyn CheckpointStore>, dead_zone: u32) -> Self {
        Self {
            store,
            dead_zone,
            saved: None,
        }
    }

    /// Sends every successfully saved checkpoint to `saved`, so the parent
    /// can refresh whatever it caches about the media.
    pub fn notify_on_save(mut self, saved: mpsc::UnboundedSender<Checkpoint>) -> Self {
        self.set_notifier(saved);
        self
    }

    pub fn set_notifier(&mut self, saved: mpsc::UnboundedSender<Checkpoint>) {
        self.saved = Some(saved);
    }

    pub fn dead_zone(&self) -> u32 {
        self.dead_zone
    }

    /// Works out what to save, if anything.
    pub fn checkpoint(
        &self,
        media_id: Option<i64>,
        played: f64,
        duration: f64,
    ) -> Option<Checkpoint> {
        let elapsed = (played * duration).floor();
        if !elapsed.is_finite() || elapsed <= self.dead_zone as f64 {
            debug!(elapsed, dead_zone = self.dead_zone, "not saving checkpoint for short view");
            return None;
        }
        let Some(media_id) = media_id.and_then(valid_media_id) else {
            debug!(?media_id, "not saving checkpoint for invalid media id");
            return None;
        };
        let elapsed_seconds = elapsed.min(i32::MAX as f64) as u32;
        Some(Checkpoint {
            media_id,
            elapsed_seconds,
        })
    }

    /// Fires the save in the background. The returned handle is only useful
    /// to callers that want to wait for completion; teardown never does.
    pub fn persist(
        &self,
        media_id: Option<i64>,
        played: f64,
        duration: f64,
    ) -> Option<JoinHandle<()>> {
        let checkpoint = self.checkpoint(media_id, played, duration)?;
        let Ok(runtime) = Handle::try_current() else {
            warn!(?checkpoint, "no async runtime, resume point lost");
            return None;
        };
        let store = Arc::clone(&self.store);
        let saved = self.saved.clone();
        Some(runtime.spawn(async move {
            match store
                .save_checkpoint(checkpoint.media_id, checkpoint.elapsed_seconds)
                .await
            {
                Ok(()) => {
                    info!(
                        media_id = checkpoint.media_id,
                        elapsed_seconds = checkpoint.elapsed_seconds,
                        "resume point saved"
                    );
                    if let Some(saved) = saved {
                        let _ = saved.send(checkpoint);
                    }
                }
                Err(e) => warn!(
                    media_id = checkpoint.media_id,
                    elapsed_seconds = checkpoint.elapsed_seconds,
                    "failed to save resume point: {}",
                    e
                ),
            }
        }))
    }
}
