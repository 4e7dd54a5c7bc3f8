/// Reasons an uploaded image file name is refused.
#[derive(Debug, PartialEq, Eq)]
pub enum ImageNameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename has no extension to guess a type from.
    MissingExtension,
    /// Extension does not map to an `image/*` MIME type.
    NotAnImage,
}

impl ImageNameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Image filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::MissingExtension => "Image filename must have an extension",
            Self::NotAnImage => "Only image uploads are accepted",
        }
    }
}

/// A client-supplied image file name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    pub file_name: String,
    /// Lowercased extension without the dot.
    pub extension: String,
    pub content_type: String,
}

/// Validates the file name of an uploaded image.
///
/// The name must be flat (no directory components) and its extension must
/// map to an `image/*` MIME type.
pub fn validate_image_filename(filename: &str) -> Result<ImageName, ImageNameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(ImageNameError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(ImageNameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // header injection when the name is logged or echoed.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(ImageNameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(ImageNameError::ContainsPathSeparator);
    }

    if trimmed.starts_with('.') {
        return Err(ImageNameError::Hidden);
    }

    let extension = match trimmed.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => return Err(ImageNameError::MissingExtension),
    };

    let mime = mime_guess::from_ext(&extension)
        .first()
        .ok_or(ImageNameError::NotAnImage)?;
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ImageNameError::NotAnImage);
    }

    Ok(ImageName {
        file_name: trimmed.to_string(),
        extension,
        content_type: mime.to_string(),
    })
}
