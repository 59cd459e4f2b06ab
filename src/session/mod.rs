use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task;
use uuid::Uuid;

use crate::engine::GenerationParams;
use crate::error::{BridgeError, Result};
use crate::events::TokenSink;
use crate::lifecycle::{EngineSlot, ModelLifecycle};

/// One accepted generation request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    pub params: HashMap<String, f64>,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: HashMap::new(),
        }
    }
}

/// Runs one streaming generation at a time against the loaded engine.
///
/// Overlap policy: a second `run` while one is active fails with `Busy`
/// immediately instead of queuing; the engine holds exclusive mutable state
/// during generation, so there is nothing useful to pipeline.
#[derive(Clone)]
pub struct InferenceSession {
    slot: Arc<Mutex<EngineSlot>>,
}

impl InferenceSession {
    pub fn new(lifecycle: &ModelLifecycle) -> Self {
        Self {
            slot: lifecycle.slot(),
        }
    }

    /// Stream one generation into `sink`. Tokens are emitted in production
    /// order, each one before the next is requested from the engine, and all
    /// of them before this call returns; a caller that drains its stream
    /// before acting on the outcome sees every token first. A detached sink
    /// swallows tokens without failing the session.
    pub async fn run(&self, request: InferenceRequest, sink: TokenSink) -> Result<()> {
        let mut slot = self.slot.try_lock().map_err(|_| BridgeError::Busy)?;
        let mut engine = slot.engine.take().ok_or(BridgeError::InvalidState)?;

        let id = Uuid::new_v4();
        let params = GenerationParams::from_map(&request.params);
        tracing::debug!(session = %id, prompt_len = request.prompt.len(), "session started");

        let result = task::spawn_blocking(move || {
            let mut produced = 0usize;
            let mut on_token = |token: &str| {
                sink.emit(token);
                produced += 1;
            };
            let outcome = engine.generate(&request.prompt, &params, &mut on_token);
            (engine, outcome, produced)
        })
        .await;

        match result {
            Ok((engine, outcome, produced)) => {
                // Check the handle back in even when generation failed; the
                // model itself is still loaded.
                slot.engine = Some(engine);
                match outcome {
                    Ok(()) => {
                        tracing::debug!(session = %id, tokens = produced, "session done");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::warn!(session = %id, error = %e, "session failed");
                        Err(BridgeError::InferenceFailed(e.to_string()))
                    }
                }
            }
            Err(join_err) => {
                // The engine box died with the panicked worker; the slot
                // stays empty, which reads as Unloaded.
                tracing::error!(session = %id, error = %join_err, "generation task panicked");
                Err(BridgeError::InferenceFailed(format!(
                    "generation task panicked: {join_err}"
                )))
            }
        }
    }
}
