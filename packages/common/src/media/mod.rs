mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::MediaError;
pub use traits::{IMAGE_FOLDER, MediaStore, UploadedImage, new_public_id, validate_public_id};
