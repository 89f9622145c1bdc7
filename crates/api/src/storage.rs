//! Local storage for uploaded images.
//!
//! Files are written under the public uploads directory (served at
//! `/uploads`) with server-generated names; records keep their public URLs.

use std::io;
use std::path::{Path, PathBuf};

use openpaws_core::upload::{public_url, stored_file_name};

use crate::form::UploadedImage;

/// An image written to disk.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub path: PathBuf,
    pub url: String,
}

/// Writes images into one directory and builds their public URLs.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    base_url: String,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the uploads directory if it does not exist.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write every image, all or nothing: if one write fails, the files
    /// already written by this call are removed.
    pub async fn save_all(&self, images: &[UploadedImage]) -> io::Result<Vec<StoredImage>> {
        let mut stored = Vec::with_capacity(images.len());
        for image in images {
            match self.save(image).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    self.remove_all(&stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    /// Best-effort removal of previously stored files.
    pub async fn remove_all(&self, files: &[StoredImage]) {
        for file in files {
            if let Err(e) = tokio::fs::remove_file(&file.path).await {
                tracing::warn!(path = %file.path.display(), error = %e, "Failed to remove stored image");
            }
        }
    }

    async fn save(&self, image: &UploadedImage) -> io::Result<StoredImage> {
        let file_name = stored_file_name(image.kind);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &image.data).await?;
        tracing::debug!(
            original = %image.file_name,
            stored = %file_name,
            bytes = image.data.len(),
            "Stored uploaded image"
        );
        Ok(StoredImage {
            url: public_url(&self.base_url, &file_name),
            path,
        })
    }
}
