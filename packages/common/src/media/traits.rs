use std::path::Path;

use async_trait::async_trait;

use super::error::MediaError;

/// Key prefix shared by every stored blog image.
pub const IMAGE_FOLDER: &str = "blog-images";

/// Location of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Publicly reachable URL of the asset.
    pub image_url: String,
    /// Opaque identifier needed to delete the asset later.
    pub public_id: String,
}

/// Image host for blog attachments.
///
/// Implementations receive a file that already sits on local disk and hand
/// back a URL plus a deletion identifier. The caller owns the local file.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload the file at `path`.
    async fn upload(&self, path: &Path) -> Result<UploadedImage, MediaError>;

    /// Remove a previously uploaded asset.
    ///
    /// Deleting an asset that is already gone is not an error.
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Generate a fresh public id for `path`, keeping its extension.
pub fn new_public_id(path: &Path) -> String {
    let id = uuid::Uuid::now_v7();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{IMAGE_FOLDER}/{id}.{}", ext.to_ascii_lowercase())
        }
        _ => format!("{IMAGE_FOLDER}/{id}"),
    }
}

/// Check that `public_id` is a single key under [`IMAGE_FOLDER`].
pub fn validate_public_id(public_id: &str) -> Result<&str, MediaError> {
    let name = public_id
        .strip_prefix(IMAGE_FOLDER)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| MediaError::InvalidId(public_id.to_string()))?;

    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.chars().any(|c| c.is_ascii_control())
    {
        return Err(MediaError::InvalidId(public_id.to_string()));
    }

    Ok(public_id)
}

pub(crate) fn join_url(base: &str, public_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), public_id)
}
