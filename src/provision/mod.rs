use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::task;

use crate::error::{BridgeError, Result};

/// One copy command's worth of work: which files to bring from the
/// user-granted source tree into the private target directory.
#[derive(Debug, Clone)]
pub struct CopyManifest {
    /// Root of the user-granted folder. May be partially unreadable.
    pub source_root: PathBuf,
    pub target_dir: PathBuf,
    pub file_names: Vec<String>,
}

/// Copies model assets from an external tree into private storage,
/// idempotently. No shared in-process state; everything goes through the
/// file system.
#[derive(Debug, Clone, Default)]
pub struct AssetProvisioner;

impl AssetProvisioner {
    pub fn new() -> Self {
        Self
    }

    /// Process the manifest in order. Files already present non-empty in the
    /// target are skipped; names absent from the source tree are collected
    /// and reported together at the end so the caller learns every gap in
    /// one round trip. An I/O fault stops the run; whatever was already
    /// written stays in place.
    pub async fn copy(&self, manifest: CopyManifest) -> Result<()> {
        task::spawn_blocking(move || copy_blocking(&manifest))
            .await
            .map_err(|e| BridgeError::copy_io(anyhow::anyhow!("copy task panicked: {e}")))?
    }
}

fn copy_blocking(manifest: &CopyManifest) -> Result<()> {
    fs::create_dir_all(&manifest.target_dir).map_err(|e| {
        BridgeError::copy_io(anyhow::anyhow!(
            "cannot create {}: {e}",
            manifest.target_dir.display()
        ))
    })?;

    let mut missing: Vec<String> = Vec::new();

    for name in &manifest.file_names {
        let dest = manifest.target_dir.join(name);

        if let Ok(meta) = fs::metadata(&dest) {
            if meta.is_file() && meta.len() > 0 {
                tracing::debug!(file = %name, "already provisioned, skipping");
                continue;
            }
        }

        let Some(source) = locate(&manifest.source_root, name) else {
            tracing::debug!(file = %name, "not found in source tree");
            missing.push(name.clone());
            continue;
        };

        stream_copy(&source, &dest).map_err(|e| BridgeError::CopyFailed {
            missing: missing.clone(),
            reason: format!("copying {name}: {e}"),
        })?;
        tracing::debug!(file = %name, from = %source.display(), "copied");
    }

    if !missing.is_empty() {
        return Err(BridgeError::copy_missing(missing));
    }

    tracing::info!(
        files = manifest.file_names.len(),
        target = %manifest.target_dir.display(),
        "provisioning complete"
    );
    Ok(())
}

fn stream_copy(source: &Path, dest: &Path) -> io::Result<u64> {
    let mut reader = fs::File::open(source)?;
    let mut writer = fs::File::create(dest)?;
    io::copy(&mut reader, &mut writer)
}

/// Find `name` anywhere under `root`, direct children first. Unreadable
/// subtrees are skipped rather than failing the whole copy; a granted
/// folder is allowed to be partially inaccessible.
fn locate(root: &Path, name: &str) -> Option<PathBuf> {
    let direct = root.join(name);
    if direct.is_file() {
        return Some(direct);
    }

    let entries = fs::read_dir(root).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().is_some_and(|n| n == name) {
            return Some(path);
        }
    }
    subdirs.into_iter().find_map(|dir| locate(&dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_finds_nested_files() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("weights.onnx"), b"w").unwrap();

        let found = locate(root.path(), "weights.onnx").unwrap();
        assert_eq!(found, nested.join("weights.onnx"));
        assert!(locate(root.path(), "absent.bin").is_none());
    }
}
