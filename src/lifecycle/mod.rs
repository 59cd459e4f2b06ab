use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task;

use crate::engine::{Engine, EngineFactory};
use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unloaded,
    Loaded,
}

/// The one piece of shared mutable state in the bridge. `load` and `unload`
/// hold the lock for their whole duration; a running session holds it for
/// the whole generation. The engine box only ever leaves the slot while the
/// lock is held.
pub(crate) struct EngineSlot {
    pub(crate) engine: Option<Box<dyn Engine>>,
}

/// Owns the engine handle and its load/unload cycle. One instance per
/// bridge; clones share the same slot.
#[derive(Clone)]
pub struct ModelLifecycle {
    factory: Arc<dyn EngineFactory>,
    slot: Arc<Mutex<EngineSlot>>,
}

impl ModelLifecycle {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            slot: Arc::new(Mutex::new(EngineSlot { engine: None })),
        }
    }

    pub(crate) fn slot(&self) -> Arc<Mutex<EngineSlot>> {
        self.slot.clone()
    }

    /// Construct an engine from `path`. A model that is already loaded is
    /// replaced: the old handle is dropped before construction starts, so a
    /// failed construction leaves the lifecycle Unloaded, not on the old
    /// model. Waits for an active session to finish first.
    pub async fn load(&self, path: &Path) -> Result<()> {
        let mut slot = self.slot.lock().await;

        if slot.engine.take().is_some() {
            tracing::info!(path = %path.display(), "replacing loaded model");
        }

        let factory = self.factory.clone();
        let path_buf: PathBuf = path.to_path_buf();
        let constructed = task::spawn_blocking(move || factory.construct(&path_buf))
            .await
            .map_err(|e| BridgeError::LoadFailed(format!("load task panicked: {e}")))?;

        match constructed {
            Ok(engine) => {
                slot.engine = Some(engine);
                tracing::info!(path = %path.display(), "model loaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "model load failed");
                Err(BridgeError::LoadFailed(e.to_string()))
            }
        }
    }

    /// Drop the engine handle. Never fails; unloading while Unloaded is a
    /// no-op so callers can always get back to a clean state.
    pub async fn unload(&self) {
        let mut slot = self.slot.lock().await;
        if slot.engine.take().is_some() {
            tracing::info!("model unloaded");
        }
    }

    pub async fn state(&self) -> LifecycleState {
        if self.slot.lock().await.engine.is_some() {
            LifecycleState::Loaded
        } else {
            LifecycleState::Unloaded
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.state().await == LifecycleState::Loaded
    }
}
