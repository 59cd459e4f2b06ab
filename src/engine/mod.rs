use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

/// Sampling/generation knobs, decoded from the loosely typed name -> number
/// map that arrives over the wire. Unknown names are ignored.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_length: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
            max_length: 1024,
        }
    }
}

impl GenerationParams {
    pub fn from_map(m: &HashMap<String, f64>) -> Self {
        let mut params = Self::default();

        if let Some(v) = m.get("temperature") {
            params.temperature = *v as f32;
        }
        if let Some(v) = m.get("top_p") {
            params.top_p = *v as f32;
        }
        if let Some(v) = m.get("max_length") {
            if *v > 0.0 {
                params.max_length = *v as usize;
            }
        }

        params
    }
}

/// One loaded engine instance. The bridge holds at most one of these at a
/// time and never calls into it from two tasks at once; implementations may
/// keep mutable generation state without further locking. Dropping the box
/// releases the instance.
pub trait Engine: Send {
    /// Run one generation to completion, invoking `on_token` once per
    /// produced fragment, in production order, before returning.
    fn generate(
        &mut self,
        prompt: &str,
        params: &GenerationParams,
        on_token: &mut dyn FnMut(&str),
    ) -> Result<()>;
}

/// Constructs engine instances from model files on disk. The sole seam to
/// the native engine; tests substitute a scripted factory here.
pub trait EngineFactory: Send + Sync {
    fn construct(&self, path: &Path) -> Result<Box<dyn Engine>>;
}
