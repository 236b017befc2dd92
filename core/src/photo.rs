//! Photo attachments and the multipart/form-data encoding used to upload them.

use std::fs;
use std::path::Path;

use crate::error::ClientError;

/// An image read from disk, ready to be attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Photo {
    /// Reads `path` and derives the part content type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let data = fs::read(path).map_err(|source| ClientError::Photo {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            data,
        })
    }
}

fn content_type_for(path: &Path) -> mime::Mime {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("tif" | "tiff") => "image/tiff"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// A multipart/form-data body built in memory.
#[derive(Debug)]
pub struct Multipart {
    boundary: String,
    data: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self {
            boundary: format!("----petfriends-{}", uuid::Uuid::new_v4().simple()),
            data: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.data
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.data.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.data.extend_from_slice(value.as_bytes());
        self.data.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, photo: &Photo) -> Self {
        self.data
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n",
                photo.file_name
            )
            .as_bytes(),
        );
        self.data
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", photo.content_type).as_bytes());
        self.data.extend_from_slice(&photo.data);
        self.data.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Closes the body and returns `(content_type, bytes)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.data
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (self.content_type(), self.data)
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}
