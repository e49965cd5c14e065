//! Cloudinary image host.

use super::{ImageHost, ImageHostError, UploadedImage};
use crate::config::CloudinaryConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// All uploads land in this folder of the Cloudinary media library.
const UPLOAD_FOLDER: &str = "recipeshare";

pub struct CloudinaryHost {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> CloudinaryHost {
        CloudinaryHost {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Signed upload per the Cloudinary API: SHA-256 over the alphabetized
    /// parameter string with the API secret appended.
    fn sign(&self, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            UPLOAD_FOLDER, timestamp, self.config.api_secret
        );
        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        content_type: &str,
        data: &[u8],
    ) -> Result<UploadedImage, ImageHostError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(timestamp);

        let file_part = Part::bytes(data.to_vec())
            .file_name("photo")
            .mime_str(content_type)?;
        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", UPLOAD_FOLDER)
            .text("signature", signature)
            .part("file", file_part);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => "unknown error".to_string(),
            };
            return Err(ImageHostError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::ParseError(e.to_string()))?;
        Ok(UploadedImage {
            url: body.secure_url,
        })
    }

    fn host_name(&self) -> &'static str {
        "cloudinary"
    }
}

impl fmt::Debug for CloudinaryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryHost")
            .field("cloud_name", &self.config.cloud_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_for_fixed_inputs() {
        let host = CloudinaryHost::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "abcd".to_string(),
        });
        let first = host.sign(1700000000);
        let second = host.sign(1700000000);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, host.sign(1700000001));
    }
}
