use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Single-subscriber token stream. `subscribe` hands out a fresh receiver
/// (replacing any previous one), `cancel` detaches it; while no subscriber
/// is attached, emitted tokens are dropped silently. Mirrors the host-side
/// event channel's listen/cancel lifecycle.
#[derive(Clone, Default)]
pub struct TokenChannel {
    tx: Arc<RwLock<Option<mpsc::UnboundedSender<String>>>>,
}

impl TokenChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber. An existing subscriber, if any, is detached
    /// first; its receiver keeps whatever was already queued but sees no
    /// further tokens.
    pub fn subscribe(&self) -> TokenStream {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.tx.write() = Some(tx);
        UnboundedReceiverStream::new(rx)
    }

    pub fn cancel(&self) {
        *self.tx.write() = None;
    }

    pub fn has_subscriber(&self) -> bool {
        self.tx.read().is_some()
    }

    /// Producer-side handle for a session to emit through.
    pub fn sink(&self) -> TokenSink {
        TokenSink {
            tx: self.tx.clone(),
        }
    }
}

/// Write end of a [`TokenChannel`]. Emits never fail: a detached or dropped
/// subscriber just swallows the token.
#[derive(Clone)]
pub struct TokenSink {
    tx: Arc<RwLock<Option<mpsc::UnboundedSender<String>>>>,
}

impl TokenSink {
    pub fn emit(&self, token: &str) {
        if let Some(tx) = self.tx.read().as_ref() {
            // Receiver may have been dropped without a cancel; ignore.
            let _ = tx.send(token.to_string());
        }
    }
}

pub type TokenStream = UnboundedReceiverStream<String>;
