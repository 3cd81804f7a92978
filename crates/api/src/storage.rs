//! Blueprint artifact storage.
//!
//! Artifacts live under a single configured root directory and are addressed
//! by relative paths (`maps/uploads/...`, `maps/renders/...`). The store owns
//! the mapping between those relative paths, absolute filesystem paths, and
//! the public URLs handed to clients.

use std::path::{Path, PathBuf};

use planview_core::error::CoreError;

/// Filesystem-backed artifact store rooted at one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute filesystem path for a stored artifact.
    pub fn absolute_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Public URL for a stored artifact.
    pub fn url(&self, relative: &str) -> String {
        format!("/storage/{relative}")
    }

    /// Whether an artifact exists at the relative path.
    pub async fn exists(&self, relative: &str) -> bool {
        tokio::fs::try_exists(self.absolute_path(relative))
            .await
            .unwrap_or(false)
    }

    /// Write an artifact, creating parent directories as needed.
    pub async fn write(&self, relative: &str, bytes: &[u8]) -> Result<(), CoreError> {
        let path = self.absolute_path(relative);
        self.ensure_parent(&path).await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Storage(format!("failed to write {relative}: {e}")))
    }

    /// Create the parent directory for an artifact that an external process
    /// is about to write.
    pub async fn prepare_parent(&self, relative: &str) -> Result<(), CoreError> {
        self.ensure_parent(&self.absolute_path(relative)).await
    }

    /// Copy one stored artifact to another relative path.
    pub async fn copy(&self, from: &str, to: &str) -> Result<(), CoreError> {
        let dest = self.absolute_path(to);
        self.ensure_parent(&dest).await?;
        tokio::fs::copy(self.absolute_path(from), &dest)
            .await
            .map_err(|e| CoreError::Storage(format!("failed to copy {from} to {to}: {e}")))?;
        Ok(())
    }

    async fn ensure_parent(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Storage(format!("failed to create {parent:?}: {e}")))?;
        }
        Ok(())
    }
}
