//! Multipart form collection for report uploads.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A file part buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Parsed multipart body: at most one file plus the text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// The uploaded file, or a 400 naming the expected field.
    pub fn require_file(self, expected: &str) -> AppResult<(UploadedFile, HashMap<String, String>)> {
        match self.file {
            Some(file) => Ok((file, self.fields)),
            None => Err(AppError::InvalidInput(format!(
                "No file uploaded (expected a '{}' field)",
                expected
            ))),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Collect a multipart payload.
///
/// Parts named in `file_fields` that carry a file name are buffered as the
/// upload; other parts are read as text fields. The total payload is capped
/// at `max_size` bytes.
pub async fn collect_upload(
    mut payload: Multipart,
    file_fields: &[&str],
    max_size: usize,
) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    let mut total_size: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let (name, file_name) = {
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
            (
                content_disposition.get_name().unwrap_or_default().to_string(),
                content_disposition.get_filename().map(str::to_string),
            )
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            total_size += chunk.len();
            if total_size > max_size {
                return Err(AppError::InvalidInput(format!(
                    "Upload exceeds the maximum size of {} bytes",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) if file_fields.contains(&name.as_str()) => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Only one file may be uploaded".to_string(),
                    ));
                }
                debug!("Received file part '{}' ({} bytes)", name, data.len());
                form.file = Some(UploadedFile {
                    field: name,
                    file_name,
                    data,
                });
            }
            Some(_) => {
                debug!("Ignoring unexpected file part '{}'", name);
            }
            None => {
                let value = String::from_utf8_lossy(&data).trim().to_string();
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
