pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod provision;
pub mod router;
pub mod session;

pub use bridge::Bridge;
pub use config::{init_logging, BridgeConfig};
pub use engine::{Engine, EngineFactory, GenerationParams};
pub use error::{BridgeError, Result};
pub use events::{TokenChannel, TokenSink, TokenStream};
pub use lifecycle::{LifecycleState, ModelLifecycle};
pub use provision::{AssetProvisioner, CopyManifest};
pub use router::{protocol, CommandResult, CommandRouter, ProtocolHandler};
pub use session::{InferenceRequest, InferenceSession};
