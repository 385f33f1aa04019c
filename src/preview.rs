use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

use crate::error::PreviewError;

/// A file chosen by the user, held in memory until it is submitted or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Content type sniffed from the leading bytes.
    pub fn mime_type(&self) -> &'static str {
        image::guess_format(&self.bytes)
            .map(mime_for)
            .unwrap_or("application/octet-stream")
    }
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Client-only data URL copy of a `SelectedFile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub data_url: String,
}

impl PreviewImage {
    pub fn render(file: &SelectedFile) -> Result<Self, PreviewError> {
        let format = image::guess_format(&file.bytes).map_err(|_| PreviewError::UnrecognizedFormat)?;
        let payload = general_purpose::STANDARD.encode(&file.bytes);
        Ok(Self {
            data_url: format!("data:{};base64,{}", mime_for(format), payload),
        })
    }

    /// Renders on the blocking pool; large files take a while to encode.
    pub async fn render_async(file: SelectedFile) -> Result<Self, PreviewError> {
        tokio::task::spawn_blocking(move || Self::render(&file))
            .await
            .map_err(|e| PreviewError::Worker(e.to_string()))?
    }
}
