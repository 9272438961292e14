/// Upload storage for inquiry attachments.
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::middleware::error_handling::{AppError, Result};

#[derive(Debug, Clone)]
pub struct UploadStorage {
    base_path: PathBuf,
}

impl UploadStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Save an attachment under a generated name and return the relative path
    /// stored on the inquiry record.
    pub async fn save_attachment(&self, original_name: &str, data: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::Storage(format!(
                "failed to create uploads directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let file_name = match sanitized_extension(original_name) {
            Some(ext) => format!("inquiry-{}.{}", Utc::now().timestamp_millis(), ext),
            None => format!("inquiry-{}", Utc::now().timestamp_millis()),
        };
        let upload_path = self.base_path.join(&file_name);

        fs::write(&upload_path, data).await.map_err(|e| {
            AppError::Storage(format!(
                "failed to write upload {}: {}",
                upload_path.display(),
                e
            ))
        })?;

        tracing::info!("File uploaded to {}", upload_path.display());
        Ok(format!("uploads/{file_name}"))
    }

    /// Open a previously saved upload by its relative path.
    ///
    /// The resolved path must stay inside the uploads root: any non-normal
    /// path component is refused before touching the filesystem, and the
    /// canonicalized result is checked again afterwards.
    pub async fn open(&self, relative: &str) -> Result<(Vec<u8>, String)> {
        let relative = relative.strip_prefix("uploads/").unwrap_or(relative);
        let rel_path = Path::new(relative);

        if relative.is_empty()
            || rel_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let full_path = self.base_path.join(rel_path);
        if !fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        let root = fs::canonicalize(&self.base_path)
            .await
            .map_err(|_| AppError::NotFound("File not found".to_string()))?;
        let canonical = fs::canonicalize(&full_path)
            .await
            .map_err(|_| AppError::NotFound("File not found".to_string()))?;
        if !canonical.starts_with(&root) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let data = fs::read(&canonical).await.map_err(|e| {
            AppError::Storage(format!("failed to read {}: {}", canonical.display(), e))
        })?;
        let file_name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.to_string());

        Ok((data, file_name))
    }
}

/// Keep only a plain alphanumeric extension from the client-supplied name.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
