use std::sync::Arc;

use serde_json::Value;

use crate::config::BridgeConfig;
use crate::engine::EngineFactory;
use crate::events::{TokenChannel, TokenStream};
use crate::lifecycle::{LifecycleState, ModelLifecycle};
use crate::provision::AssetProvisioner;
use crate::router::{CommandResult, CommandRouter, ProtocolHandler};
use crate::session::InferenceSession;

/// The assembled bridge: one engine slot, one token channel, one router.
/// A platform shell forwards its method calls to [`Bridge::handle`] and its
/// event-channel listen/cancel to [`Bridge::subscribe`]/[`Bridge::cancel`].
/// Instances are independent; tests construct as many as they like.
pub struct Bridge {
    config: BridgeConfig,
    lifecycle: ModelLifecycle,
    tokens: TokenChannel,
    router: CommandRouter,
}

impl Bridge {
    pub fn new(config: BridgeConfig, factory: Arc<dyn EngineFactory>) -> Self {
        let lifecycle = ModelLifecycle::new(factory);
        let session = InferenceSession::new(&lifecycle);
        let tokens = TokenChannel::new();
        let router = CommandRouter::new(
            lifecycle.clone(),
            session,
            AssetProvisioner::new(),
            tokens.clone(),
        );

        Self {
            config,
            lifecycle,
            tokens,
            router,
        }
    }

    /// Construct with configuration taken from the environment.
    pub fn with_factory(factory: Arc<dyn EngineFactory>) -> Self {
        Self::new(BridgeConfig::from_env(), factory)
    }

    /// Entry point for inbound commands. Never panics and never returns an
    /// unmapped error; unknown methods come back as `UNAVAILABLE`.
    pub async fn handle(&self, method: &str, args: &Value) -> CommandResult {
        self.router.dispatch(method, args).await
    }

    /// Attach the (single) token subscriber; replaces any previous one.
    pub fn subscribe(&self) -> TokenStream {
        self.tokens.subscribe()
    }

    /// Detach the token subscriber. Sessions keep running; their tokens are
    /// dropped silently from here on.
    pub fn cancel(&self) {
        self.tokens.cancel();
    }

    pub async fn state(&self) -> LifecycleState {
        self.lifecycle.state().await
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ProtocolHandler for Bridge {
    async fn handle(&self, method: &str, args: &Value) -> CommandResult {
        Bridge::handle(self, method, args).await
    }
}
