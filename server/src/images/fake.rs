//! Fake image host for testing.
//!
//! Uploads are recorded in memory and handed back deterministic URLs, so
//! tests can exercise photo handling without network access.

use super::{ImageHost, ImageHostError, UploadedImage};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct FakeImageHost {
    uploads: Mutex<Vec<StoredUpload>>,
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub content_type: String,
    pub size: usize,
}

impl FakeImageHost {
    pub fn new() -> FakeImageHost {
        FakeImageHost::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().expect("fake host lock poisoned").len()
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(
        &self,
        content_type: &str,
        data: &[u8],
    ) -> Result<UploadedImage, ImageHostError> {
        let mut uploads = self.uploads.lock().expect("fake host lock poisoned");
        uploads.push(StoredUpload {
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(UploadedImage {
            url: format!("https://images.invalid/recipeshare/{}", uploads.len()),
        })
    }

    fn host_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_uploads_and_returns_distinct_urls() {
        let host = FakeImageHost::new();
        let first = host.upload("image/jpeg", &[1, 2, 3]).await.unwrap();
        let second = host.upload("image/png", &[4, 5]).await.unwrap();
        assert_ne!(first.url, second.url);
        assert_eq!(host.upload_count(), 2);
    }
}
