//! Deployment workspace: the git working tree the artifact is written into.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// A directory on disk that receives the approved artifact.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the workspace directory if it does not exist yet.
    pub async fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create workspace {}", root.display()))?;
        Ok(Self { root })
    }

    /// Absolute-or-relative path of a file inside the workspace.
    pub fn path_of(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Write a file relative to the workspace root, verbatim.
    pub async fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let full = self.path_of(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&full, content)
            .await
            .with_context(|| format!("Failed to write {}", full.display()))?;
        tracing::debug!(path = %full.display(), bytes = content.len(), "Wrote file");
        Ok(full)
    }

}
