//! Local-disk storage for uploaded report files.
//!
//! Files live under the configured upload directory and are addressed by a
//! path relative to it, which is what gets stored on the report row and
//! served under `/uploads`.

use std::path::{Component, Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Upload directory wrapper.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create the storage, making sure the root directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        info!("Upload storage initialized: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the relative key for a report file.
    ///
    /// Format: `reports/{report_id}/{uuid}-{sanitized file name}`
    pub fn report_key(report_id: i32, file_name: &str) -> String {
        format!(
            "reports/{}/{}-{}",
            report_id,
            Uuid::new_v4(),
            sanitize_file_name(file_name)
        )
    }

    /// Resolve a relative key inside the root, rejecting traversal.
    pub fn resolve(&self, relative: &str) -> AppResult<PathBuf> {
        let path = Path::new(relative);
        let escapes = relative.is_empty()
            || path.is_absolute()
            || path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(AppError::InvalidInput(format!(
                "Invalid file path: {}",
                relative
            )));
        }
        Ok(self.root.join(path))
    }

    /// Store a report file and return its relative key.
    pub async fn put(&self, report_id: i32, file_name: &str, data: &[u8]) -> AppResult<String> {
        let key = Self::report_key(report_id, file_name);
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create directory for {}: {}", key, e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", key, e)))?;

        info!("Stored {} ({} bytes)", key, data.len());
        Ok(key)
    }

    /// Read a stored file.
    pub async fn read(&self, relative: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(relative)?;
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("File {}", relative))
            } else {
                AppError::Storage(format!("Failed to read {}: {}", relative, e))
            }
        })
    }

    /// Delete a stored file. Returns false when it was already gone.
    pub async fn delete(&self, relative: &str) -> AppResult<bool> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                if let Some(parent) = path.parent() {
                    // Only succeeds when the report directory is now empty.
                    let _ = tokio::fs::remove_dir(parent).await;
                }
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete {}: {}",
                relative, e
            ))),
        }
    }

    /// Delete several files, logging failures instead of returning them.
    pub async fn delete_all(&self, relatives: &[String]) {
        for relative in relatives {
            if let Err(e) = self.delete(relative).await {
                tracing::warn!("Failed to remove uploaded file {}: {}", relative, e);
            }
        }
    }
}

/// Keep the final path segment and replace anything outside a conservative
/// character set.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
