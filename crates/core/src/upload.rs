//! Image upload rules: allowed formats, size limits, and storage naming.
//!
//! A file is accepted only when its extension and its declared MIME type
//! both name an allowed format, it fits within [`MAX_IMAGE_BYTES`], and its
//! leading bytes really are a JPEG, PNG or WebP image.

use std::path::Path;

use image::ImageFormat;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum size of a single uploaded image (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum number of images accepted in one request.
pub const MAX_IMAGES_PER_REQUEST: usize = 10;

/// Request body cap for upload routes: every image at full size plus room
/// for the JSON `data` field and multipart framing.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_IMAGES_PER_REQUEST * MAX_IMAGE_BYTES + 1024 * 1024;

/// URL path segment under which stored images are served.
pub const UPLOADS_ROUTE: &str = "uploads";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No image files uploaded")]
    NoImages,

    #[error("Unsupported file '{file_name}' ({content_type}). Only JPEG, PNG and WebP images are allowed")]
    UnsupportedType {
        file_name: String,
        content_type: String,
    },

    #[error("File '{file_name}' exceeds the {limit}-byte limit")]
    TooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },

    #[error("Too many images: at most {limit} are allowed per request")]
    TooMany { limit: usize },

    #[error("File '{file_name}' is not a valid JPEG, PNG or WebP image")]
    ContentMismatch { file_name: String },
}

// ---------------------------------------------------------------------------
// Image kinds
// ---------------------------------------------------------------------------

/// An accepted image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Resolve a MIME type such as `image/png`. Parameters are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Resolve a file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Detect the format from the file's magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match image::guess_format(data).ok()? {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Canonical extension used for stored files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one uploaded file and return its sniffed format.
pub fn validate_image(
    file_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<ImageKind, UploadError> {
    let declared = content_type.unwrap_or("application/octet-stream");
    if ImageKind::from_file_name(file_name).is_none() || ImageKind::from_mime(declared).is_none() {
        return Err(UploadError::UnsupportedType {
            file_name: file_name.to_string(),
            content_type: declared.to_string(),
        });
    }

    if data.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            file_name: file_name.to_string(),
            size: data.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }

    ImageKind::sniff(data).ok_or_else(|| UploadError::ContentMismatch {
        file_name: file_name.to_string(),
    })
}

/// Reject requests that carry more images than allowed.
pub fn validate_image_count(count: usize) -> Result<(), UploadError> {
    if count > MAX_IMAGES_PER_REQUEST {
        return Err(UploadError::TooMany {
            limit: MAX_IMAGES_PER_REQUEST,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Unique on-disk name for a stored image: `{unix_millis}-{uuid}.{ext}`.
pub fn stored_file_name(kind: ImageKind) -> String {
    format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        kind.extension()
    )
}

/// Public URL of a stored image: `{base_url}/uploads/{file_name}`.
pub fn public_url(base_url: &str, file_name: &str) -> String {
    format!(
        "{}/{UPLOADS_ROUTE}/{file_name}",
        base_url.trim_end_matches('/')
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
