use thiserror::Error;

/// Errors raised by a media host.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The local file handed to `upload` cannot be read.
    #[error("upload source not found: {0}")]
    InvalidSource(String),

    #[error("invalid public id: {0}")]
    InvalidId(String),

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("image delete failed: {0}")]
    Delete(String),

    #[error("media store misconfigured: {0}")]
    Config(String),
}
