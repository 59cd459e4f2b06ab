use std::path::PathBuf;
use std::sync::Once;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Private, writable directory model assets are provisioned into and
    /// loaded from.
    pub models_dir: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            models_dir: home.join(".genai-bridge").join("models"),
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("GENAI_BRIDGE_MODELS") {
            config.models_dir = PathBuf::from(dir);
        }

        config
    }
}

static INIT_LOGGING: Once = Once::new();

/// Install the fmt subscriber. Level comes from `GENAI_BRIDGE_LOG`
/// (default `info`). Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let level = std::env::var("GENAI_BRIDGE_LOG")
            .ok()
            .and_then(|v| v.parse::<tracing::Level>().ok())
            .unwrap_or(tracing::Level::INFO);

        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_dir_is_under_home() {
        let config = BridgeConfig::default();
        assert!(config.models_dir.ends_with(".genai-bridge/models"));
    }
}
