/// Image references: local picks awaiting upload and uploaded results
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A locally picked image, uploaded later as the multipart `image` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Local URI (plain path or `file://` URI)
    pub uri: String,
    /// MIME type sent with the upload
    #[serde(rename = "type")]
    pub mime_type: String,
    /// File name sent with the upload
    pub name: String,
}

impl ImageAsset {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Build an asset from a URI, deriving MIME type and file name from it.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let path = strip_file_scheme(&uri);

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Self {
            uri,
            mime_type,
            name,
        }
    }

    /// Filesystem path the URI points at.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(strip_file_scheme(&self.uri))
    }
}

fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

/// Result of a step-image upload, as returned by the image host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// Cover image of a draft.
///
/// A recipe opened for editing starts with its existing remote cover; only
/// a newly picked local image needs uploading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverImage {
    Local(ImageAsset),
    Remote { url: String },
}

impl CoverImage {
    /// The local asset, if this cover still needs uploading
    pub fn as_local(&self) -> Option<&ImageAsset> {
        match self {
            CoverImage::Local(asset) => Some(asset),
            CoverImage::Remote { .. } => None,
        }
    }
}
