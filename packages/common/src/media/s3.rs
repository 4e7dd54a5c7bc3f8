use std::path::Path;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tokio::fs;
use tracing::debug;

use super::error::MediaError;
use super::traits::{MediaStore, UploadedImage, join_url, new_public_id, validate_public_id};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO, R2, ...). `None` uses AWS.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

/// Media store backed by an S3-compatible bucket.
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_url: String,
}

impl S3MediaStore {
    pub fn new(settings: &S3Settings, public_url: impl Into<String>) -> Result<Self, MediaError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings
                .region
                .parse()
                .map_err(|e| MediaError::Config(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            settings.access_key.as_deref(),
            settings.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| MediaError::Config(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| MediaError::Config(format!("invalid bucket: {e}")))?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_url: public_url.into(),
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, path: &Path) -> Result<UploadedImage, MediaError> {
        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MediaError::InvalidSource(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let public_id = new_public_id(path);
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        let response = self
            .bucket
            .put_object_with_content_type(&public_id, &data, &content_type)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;
        if !is_success(response.status_code()) {
            return Err(MediaError::Upload(format!(
                "bucket returned status {}",
                response.status_code()
            )));
        }

        debug!(%public_id, size = data.len(), "Uploaded image to bucket");

        Ok(UploadedImage {
            image_url: join_url(&self.public_url, &public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let public_id = validate_public_id(public_id)?;

        let response = self
            .bucket
            .delete_object(public_id)
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;
        let status = response.status_code();
        if !is_success(status) && status != 404 {
            return Err(MediaError::Delete(format!("bucket returned status {status}")));
        }

        debug!(%public_id, "Deleted image from bucket");
        Ok(())
    }
}
