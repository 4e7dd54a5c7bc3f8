use std::path::Path;

use axum::extract::multipart::Field;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;
use crate::utils::filename::validate_image_filename;

/// An uploaded image parked in a local temporary file.
///
/// The file is removed when this value is dropped, whatever happened to the
/// upload in between.
#[derive(Debug)]
pub struct StagedImage {
    path: TempPath,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl StagedImage {
    /// Local path of the staged bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Stream a multipart file field into a temp file.
///
/// Returns `Ok(None)` for the empty part browsers send when no file was
/// picked.
pub async fn stage_image(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<Option<StagedImage>, AppError> {
    let raw_name = field.file_name().map(str::to_string).unwrap_or_default();

    if raw_name.trim().is_empty() {
        let rest = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
        if rest.is_empty() {
            return Ok(None);
        }
        return Err(AppError::Validation(
            "Image field must have a filename".into(),
        ));
    }

    let name =
        validate_image_filename(&raw_name).map_err(|e| AppError::Validation(e.message().into()))?;

    let path = tempfile::Builder::new()
        .prefix("blog-upload-")
        .suffix(&format!(".{}", name.extension))
        .tempfile()
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?
        .into_temp_path();

    let mut temp_file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open temp file: {e}")))?;

    let mut total_size: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        total_size += chunk.len() as u64;
        if total_size > max_size {
            return Err(AppError::Validation(format!(
                "Image exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
    drop(temp_file);

    if total_size == 0 {
        return Err(AppError::Validation("Image file is empty".into()));
    }

    tracing::debug!(
        file_name = %name.file_name,
        size = total_size,
        "Staged image upload"
    );

    Ok(Some(StagedImage {
        path,
        file_name: name.file_name,
        content_type: name.content_type,
        size: total_size,
    }))
}
