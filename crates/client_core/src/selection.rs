//! User-picked images and the pair of selections pending submission.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::ImageSlot;
use thiserror::Error;

pub const INVALID_IMAGE_ALERT: &str = "Please upload an image (JPEG, PNG)";

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{file_name} is not an image (declared type '{media_type}')")]
    NotAnImage {
        file_name: String,
        media_type: String,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SelectionError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, media_type, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Source and target picks. Replaced wholesale on every change.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    source: Option<Arc<SelectedImage>>,
    target: Option<Arc<SelectedImage>>,
}

impl Selections {
    pub fn with(&self, slot: ImageSlot, image: Arc<SelectedImage>) -> Self {
        let mut next = self.clone();
        match slot {
            ImageSlot::Source => next.source = Some(image),
            ImageSlot::Target => next.target = Some(image),
        }
        next
    }

    pub fn get(&self, slot: ImageSlot) -> Option<Arc<SelectedImage>> {
        match slot {
            ImageSlot::Source => self.source.clone(),
            ImageSlot::Target => self.target.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }
}
