//! The one versioned definition of the command/event protocol. Platform
//! shells adapt this module instead of re-declaring names and codes.

pub const PROTOCOL_VERSION: u32 = 1;

/// Inbound command names.
pub mod command {
    pub const LOAD: &str = "load";
    pub const INFERENCE: &str = "inference";
    pub const UNLOAD: &str = "unload";
    pub const COPY_MODEL_FROM_URI: &str = "copyModelFromUri";
}

/// Success payloads, one per command.
pub mod payload {
    pub const LOADED: &str = "LOADED";
    pub const DONE: &str = "DONE";
    pub const UNLOADED: &str = "UNLOADED";
    pub const COPIED: &str = "COPIED";
}

/// Wire-level failure codes.
pub mod code {
    pub const UNAVAILABLE: &str = "UNAVAILABLE";
    pub const INVALID_ARGS: &str = "INVALID_ARGS";
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    pub const INVALID_STATE: &str = "INVALID_STATE";
    pub const BUSY: &str = "BUSY";
    pub const INFERENCE_FAILED: &str = "INFERENCE_FAILED";
    pub const COPY_FAILED: &str = "COPY_FAILED";
}
