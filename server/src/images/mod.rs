mod cloudinary;
mod fake;

pub use cloudinary::CloudinaryHost;
pub use fake::FakeImageHost;

use crate::config::Config;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// File types accepted for recipe photos, as lowercase extension fragments.
pub const ALLOWED_IMAGE_TYPES: [&str; 7] =
    ["jpeg", "jpg", "png", "gif", "webp", "heic", "heif"];

#[derive(Error, Debug)]
pub enum ImageHostError {
    #[error("Upload request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Image host returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse image host response: {0}")]
    ParseError(String),

    #[error("Image host not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub url: String,
}

/// Where recipe photos end up. Handlers only see this trait, so tests and
/// local development can swap in [`FakeImageHost`].
#[async_trait]
pub trait ImageHost: Send + Sync + fmt::Debug {
    async fn upload(
        &self,
        content_type: &str,
        data: &[u8],
    ) -> Result<UploadedImage, ImageHostError>;

    fn host_name(&self) -> &'static str;
}

/// Stand-in used when no host is configured. Uploads fail, everything else
/// keeps working.
#[derive(Debug, Default)]
pub struct DisabledHost;

#[async_trait]
impl ImageHost for DisabledHost {
    async fn upload(&self, _: &str, _: &[u8]) -> Result<UploadedImage, ImageHostError> {
        Err(ImageHostError::NotConfigured(
            "set CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
        ))
    }

    fn host_name(&self) -> &'static str {
        "disabled"
    }
}

pub fn create_host(config: &Config) -> Arc<dyn ImageHost> {
    match config.image_host.as_str() {
        "fake" => Arc::new(FakeImageHost::new()),
        _ => match &config.cloudinary {
            Some(cloudinary) => Arc::new(CloudinaryHost::new(cloudinary.clone())),
            None => {
                tracing::warn!("Cloudinary credentials not set. Photo uploads will fail.");
                Arc::new(DisabledHost)
            }
        },
    }
}

/// Checks a photo's client-reported type. Both the content type and the file
/// extension have to look like a supported image.
pub fn is_supported_image(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let mime_ok = content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ALLOWED_IMAGE_TYPES.iter().any(|t| ct.contains(t))
    });
    let ext_ok = file_name
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_IMAGE_TYPES.iter().any(|t| ext == *t)
        });
    mime_ok && ext_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_image_types() {
        assert!(is_supported_image(Some("image/jpeg"), Some("dinner.jpg")));
        assert!(is_supported_image(Some("image/png"), Some("cake.png")));
        assert!(is_supported_image(Some("image/webp"), Some("soup.webp")));
        assert!(is_supported_image(Some("image/heic"), Some("IMG_0042.HEIC")));
    }

    #[test]
    fn rejects_non_images() {
        assert!(!is_supported_image(Some("application/pdf"), Some("menu.pdf")));
        assert!(!is_supported_image(Some("text/plain"), Some("notes.txt")));
    }

    #[test]
    fn requires_both_type_and_extension_to_match() {
        assert!(!is_supported_image(Some("image/jpeg"), Some("photo.txt")));
        assert!(!is_supported_image(Some("application/pdf"), Some("photo.jpg")));
    }

    #[test]
    fn rejects_missing_metadata() {
        assert!(!is_supported_image(None, Some("photo.jpg")));
        assert!(!is_supported_image(Some("image/jpeg"), None));
        assert!(!is_supported_image(Some("image/jpeg"), Some("no-extension")));
    }
}
