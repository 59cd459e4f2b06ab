#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use genai_bridge::{Engine, EngineFactory, GenerationParams};

/// Scripted engine double: replays a fixed token sequence, optionally
/// sleeping between tokens (to keep a session observably in flight) or
/// failing after a given number of emits.
pub struct MockEngine {
    tokens: Vec<String>,
    token_delay: Option<Duration>,
    fail_after: Option<usize>,
    generations: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl Engine for MockEngine {
    fn generate(
        &mut self,
        _prompt: &str,
        _params: &GenerationParams,
        on_token: &mut dyn FnMut(&str),
    ) -> Result<()> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        for (i, token) in self.tokens.iter().enumerate() {
            if self.fail_after == Some(i) {
                bail!("scripted engine fault");
            }
            on_token(token);
            if let Some(delay) = self.token_delay {
                std::thread::sleep(delay);
            }
        }
        if self.fail_after == Some(self.tokens.len()) {
            bail!("scripted engine fault");
        }
        Ok(())
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory for [`MockEngine`]s. Construction fails for paths that do not
/// exist on disk, matching a real engine rejecting a bad model path.
/// Counters expose what the bridge did with the collaborator.
pub struct MockFactory {
    tokens: Vec<String>,
    token_delay: Option<Duration>,
    fail_after: Option<usize>,
    pub constructs: Arc<AtomicUsize>,
    pub generations: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
}

impl MockFactory {
    pub fn streaming<T: Into<String>>(tokens: Vec<T>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            token_delay: None,
            fail_after: None,
            constructs: Arc::new(AtomicUsize::new(0)),
            generations: Arc::new(AtomicUsize::new(0)),
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = Some(delay);
        self
    }

    pub fn failing_after(mut self, emitted: usize) -> Self {
        self.fail_after = Some(emitted);
        self
    }
}

impl EngineFactory for MockFactory {
    fn construct(&self, path: &Path) -> Result<Box<dyn Engine>> {
        if !path.exists() {
            bail!("no such model file: {}", path.display());
        }
        self.constructs.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockEngine {
            tokens: self.tokens.clone(),
            token_delay: self.token_delay,
            fail_after: self.fail_after,
            generations: self.generations.clone(),
            drops: self.drops.clone(),
        }))
    }
}

/// A placeholder model file the mock factory will accept.
pub fn model_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"weights").unwrap();
    path
}
