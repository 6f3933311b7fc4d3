use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use uuid::Uuid;

use domain::repositories::storage::MediaStorage;

/// Media store backed by a directory on local disk. Stored paths are relative
/// to the root so they survive a root relocation.
pub struct FsMediaStorage {
    root: PathBuf,
}

impl FsMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf> {
        let relative = Path::new(stored_path);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(anyhow!("invalid stored path: {}", stored_path));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for FsMediaStorage {
    async fn store(&self, namespace: &str, filename: &str, content: &[u8]) -> Result<String> {
        // Drop any directory part a client smuggled into the filename.
        let safe_name = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("invalid filename: {}", filename))?;

        let unique_name = format!("{}_{}", Uuid::new_v4(), safe_name);
        let stored_path = format!("{}/{}", namespace, unique_name);

        let dir = self.resolve(namespace)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create media dir {}", dir.display()))?;

        let full_path = dir.join(&unique_name);
        tokio::fs::write(&full_path, content)
            .await
            .with_context(|| format!("failed to write {}", full_path.display()))?;

        Ok(stored_path)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove {}", full_path.display()))
            }
        }
    }
}
