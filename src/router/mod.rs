pub mod protocol;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::BridgeError;
use crate::events::TokenChannel;
use crate::lifecycle::ModelLifecycle;
use crate::provision::{AssetProvisioner, CopyManifest};
use crate::session::{InferenceRequest, InferenceSession};

/// Wire-level outcome of one command. Every dispatch resolves to exactly one
/// of these; components never see or build them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandResult {
    Success { payload: String },
    Failure { code: String, message: String },
}

impl CommandResult {
    fn success(payload: &str) -> Self {
        CommandResult::Success {
            payload: payload.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success { .. })
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            CommandResult::Success { .. } => None,
            CommandResult::Failure { code, .. } => Some(code),
        }
    }
}

impl From<BridgeError> for CommandResult {
    fn from(err: BridgeError) -> Self {
        CommandResult::Failure {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// The command surface a platform shell drives. Each shell is a thin
/// adapter over one implementation of this trait; the protocol is defined
/// once, in [`protocol`], not per shell.
#[async_trait]
pub trait ProtocolHandler: Send + Sync {
    async fn handle(&self, method: &str, args: &Value) -> CommandResult;
}

/// Parses inbound commands, validates argument shapes, dispatches to the
/// owning component, and translates outcomes to the wire result. The only
/// place that knows the wire format.
pub struct CommandRouter {
    lifecycle: ModelLifecycle,
    session: InferenceSession,
    provisioner: AssetProvisioner,
    tokens: TokenChannel,
}

impl CommandRouter {
    pub fn new(
        lifecycle: ModelLifecycle,
        session: InferenceSession,
        provisioner: AssetProvisioner,
        tokens: TokenChannel,
    ) -> Self {
        Self {
            lifecycle,
            session,
            provisioner,
            tokens,
        }
    }

    pub async fn dispatch(&self, method: &str, args: &Value) -> CommandResult {
        tracing::debug!(method, "dispatching command");
        match method {
            protocol::command::LOAD => self.handle_load(args).await,
            protocol::command::INFERENCE => self.handle_inference(args).await,
            protocol::command::UNLOAD => self.handle_unload().await,
            protocol::command::COPY_MODEL_FROM_URI => self.handle_copy(args).await,
            other => BridgeError::Unavailable(other.to_string()).into(),
        }
    }

    async fn handle_load(&self, args: &Value) -> CommandResult {
        let path = match args.as_str() {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => return invalid_args("load expects a model path string"),
        };

        match self.lifecycle.load(&path).await {
            Ok(()) => CommandResult::success(protocol::payload::LOADED),
            Err(e) => e.into(),
        }
    }

    async fn handle_inference(&self, args: &Value) -> CommandResult {
        let request = match parse_inference_args(args) {
            Ok(r) => r,
            Err(e) => return e.into(),
        };

        match self.session.run(request, self.tokens.sink()).await {
            Ok(()) => CommandResult::success(protocol::payload::DONE),
            Err(e) => e.into(),
        }
    }

    async fn handle_unload(&self) -> CommandResult {
        self.lifecycle.unload().await;
        CommandResult::success(protocol::payload::UNLOADED)
    }

    async fn handle_copy(&self, args: &Value) -> CommandResult {
        let manifest = match parse_copy_args(args) {
            Ok(m) => m,
            Err(e) => return e.into(),
        };

        match self.provisioner.copy(manifest).await {
            Ok(()) => CommandResult::success(protocol::payload::COPIED),
            Err(e) => e.into(),
        }
    }
}

fn invalid_args(message: &str) -> CommandResult {
    BridgeError::InvalidArguments(message.to_string()).into()
}

fn parse_inference_args(args: &Value) -> Result<InferenceRequest, BridgeError> {
    let obj = args
        .as_object()
        .ok_or_else(|| BridgeError::InvalidArguments("inference expects an object".into()))?;

    let prompt = obj
        .get("prompt")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::InvalidArguments("missing prompt".into()))?
        .to_string();

    let mut params: HashMap<String, f64> = HashMap::new();
    if let Some(raw) = obj.get("params") {
        let map = raw
            .as_object()
            .ok_or_else(|| BridgeError::InvalidArguments("params must be an object".into()))?;
        for (name, value) in map {
            let number = value.as_f64().ok_or_else(|| {
                BridgeError::InvalidArguments(format!("param {name} must be a number"))
            })?;
            params.insert(name.clone(), number);
        }
    }

    Ok(InferenceRequest { prompt, params })
}

fn parse_copy_args(args: &Value) -> Result<CopyManifest, BridgeError> {
    let obj = args
        .as_object()
        .ok_or_else(|| BridgeError::InvalidArguments("copyModelFromUri expects an object".into()))?;

    let folder = obj.get("folderUri").and_then(Value::as_str);
    let target = obj.get("targetDir").and_then(Value::as_str);
    let files = obj.get("files").and_then(Value::as_array);

    let (Some(folder), Some(target), Some(files)) = (folder, target, files) else {
        return Err(BridgeError::InvalidArguments(
            "missing folderUri, targetDir, or files".into(),
        ));
    };

    let mut file_names = Vec::with_capacity(files.len());
    for value in files {
        let name = value
            .as_str()
            .ok_or_else(|| BridgeError::InvalidArguments("file names must be strings".into()))?;
        file_names.push(name.to_string());
    }

    Ok(CopyManifest {
        source_root: Path::new(folder).to_path_buf(),
        target_dir: Path::new(target).to_path_buf(),
        file_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inference_args_require_a_prompt() {
        let err = parse_inference_args(&json!({ "params": {} })).unwrap_err();
        assert_eq!(err.code(), protocol::code::INVALID_ARGS);
    }

    #[test]
    fn inference_params_default_to_empty() {
        let request = parse_inference_args(&json!({ "prompt": "hi" })).unwrap();
        assert!(request.params.is_empty());
    }

    #[test]
    fn inference_params_must_be_numeric() {
        let args = json!({ "prompt": "hi", "params": { "temperature": "hot" } });
        assert!(parse_inference_args(&args).is_err());
    }

    #[test]
    fn copy_args_require_all_three_fields() {
        let err = parse_copy_args(&json!({ "folderUri": "/m", "files": [] })).unwrap_err();
        assert_eq!(err.code(), protocol::code::INVALID_ARGS);
    }

    #[test]
    fn copy_args_preserve_file_order() {
        let args = json!({
            "folderUri": "/granted",
            "targetDir": "/private",
            "files": ["a.onnx", "b.json", "c.bin"],
        });
        let manifest = parse_copy_args(&args).unwrap();
        assert_eq!(manifest.file_names, vec!["a.onnx", "b.json", "c.bin"]);
    }

    #[test]
    fn failure_result_serializes_with_code() {
        let result: CommandResult = BridgeError::InvalidState.into();
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["status"], "failure");
        assert_eq!(wire["code"], "INVALID_STATE");
    }
}
