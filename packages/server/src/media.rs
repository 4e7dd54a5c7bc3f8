use std::sync::Arc;

use anyhow::Context;
use common::media::filesystem::FilesystemMediaStore;
use common::media::s3::{S3MediaStore, S3Settings};
use common::media::MediaStore;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

/// Build the media store selected by `storage.backend`.
pub async fn build_media_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn MediaStore>> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store =
                FilesystemMediaStore::new(config.media_dir.clone(), config.public_url.clone())
                    .await
                    .with_context(|| {
                        format!("Failed to prepare media dir {}", config.media_dir.display())
                    })?;
            info!(media_dir = %config.media_dir.display(), "Using filesystem media store");
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .context("storage.s3 must be set when storage.backend = \"s3\"")?;
            let store = S3MediaStore::new(&S3Settings::from(s3), config.public_url.clone())
                .context("Failed to configure S3 media store")?;
            info!(bucket = %s3.bucket, "Using S3 media store");
            Ok(Arc::new(store))
        }
    }
}
