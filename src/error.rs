use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Closed failure taxonomy of the bridge. Every component-level error is
/// converted into one of these at the component boundary; the router maps
/// each variant to exactly one wire code.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no such command: {0}")]
    Unavailable(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to load model: {0}")]
    LoadFailed(String),

    #[error("no model loaded")]
    InvalidState,

    #[error("another operation is in flight")]
    Busy,

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("copy failed: {reason}")]
    CopyFailed {
        /// Requested file names that could not be obtained, in manifest order.
        missing: Vec<String>,
        reason: String,
    },
}

impl BridgeError {
    pub fn copy_missing(missing: Vec<String>) -> Self {
        let reason = format!("Missing files: {}", missing.join(", "));
        BridgeError::CopyFailed { missing, reason }
    }

    pub fn copy_io(err: anyhow::Error) -> Self {
        BridgeError::CopyFailed {
            missing: Vec::new(),
            reason: err.to_string(),
        }
    }

    /// Wire-level failure code, stable across shells.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Unavailable(_) => crate::router::protocol::code::UNAVAILABLE,
            BridgeError::InvalidArguments(_) => crate::router::protocol::code::INVALID_ARGS,
            BridgeError::LoadFailed(_) => crate::router::protocol::code::LOAD_FAILED,
            BridgeError::InvalidState => crate::router::protocol::code::INVALID_STATE,
            BridgeError::Busy => crate::router::protocol::code::BUSY,
            BridgeError::InferenceFailed(_) => crate::router::protocol::code::INFERENCE_FAILED,
            BridgeError::CopyFailed { .. } => crate::router::protocol::code::COPY_FAILED,
        }
    }
}
