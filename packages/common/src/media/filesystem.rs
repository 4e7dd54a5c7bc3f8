use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::error::MediaError;
use super::traits::{
    IMAGE_FOLDER, MediaStore, UploadedImage, join_url, new_public_id, validate_public_id,
};

/// Media store backed by a local directory.
///
/// Assets live at `{base_path}/{public_id}`; the server exposes `base_path`
/// under `public_url` so the returned URLs resolve.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    public_url: String,
}

impl FilesystemMediaStore {
    /// Create the store, making sure its directories exist.
    pub async fn new(
        base_path: PathBuf,
        public_url: impl Into<String>,
    ) -> Result<Self, MediaError> {
        fs::create_dir_all(base_path.join(IMAGE_FOLDER)).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_url: public_url.into(),
        })
    }

    /// Root directory served as static media.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn asset_path(&self, public_id: &str) -> PathBuf {
        self.base_path.join(public_id)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(&self, path: &Path) -> Result<UploadedImage, MediaError> {
        if !fs::try_exists(path).await? {
            return Err(MediaError::InvalidSource(path.display().to_string()));
        }

        let public_id = new_public_id(path);
        let dest = self.asset_path(&public_id);

        // Copy then rename so a partially written asset is never visible.
        let temp_path = self.temp_path();
        if let Err(e) = fs::copy(path, &temp_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(MediaError::Upload(format!("copy failed: {e}")));
        }

        if let Err(e) = fs::rename(&temp_path, &dest).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(MediaError::Upload(format!("rename failed: {e}")));
        }

        debug!(%public_id, "Stored image");

        Ok(UploadedImage {
            image_url: join_url(&self.public_url, &public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let public_id = validate_public_id(public_id)?;

        match fs::remove_file(self.asset_path(public_id)).await {
            Ok(()) => {
                debug!(%public_id, "Deleted image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(%public_id, "Image already absent");
                Ok(())
            }
            Err(e) => Err(MediaError::Delete(e.to_string())),
        }
    }
}
