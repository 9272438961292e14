//! Local-filesystem backend: one `{key}.json` file per collection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::DocumentBackend;
use crate::middleware::error_handling::{AppError, Result};

#[derive(Debug, Clone)]
pub struct LocalBackend {
    data_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn collection_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl DocumentBackend for LocalBackend {
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let path = self.collection_path(key);
        match fs::read_to_string(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Write to a temporary sibling, then rename over the target. A reader
    /// never observes a partially written file, and the previous version
    /// survives a crash mid-write.
    async fn store(&self, key: &str, body: &str) -> Result<()> {
        let path = self.collection_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, body).await.map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            // Rename failed: clean up the temp file, the old version is intact
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::Storage(format!(
                "failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn fetch_missing_collection_is_none() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new(dir.path());
        assert!(backend.fetch("leads").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_then_fetch_round_trips() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new(dir.path());
        backend.store("leads", "[{\"id\":\"a\"}]").await.unwrap();
        assert_eq!(
            backend.fetch("leads").await.unwrap().as_deref(),
            Some("[{\"id\":\"a\"}]")
        );
    }

    #[tokio::test]
    async fn store_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new(dir.path());
        backend.store("templates", "[]").await.unwrap();
        backend.store("templates", "[1]").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["templates.json".to_string()]);
    }
}
