//! Supabase Storage upload and public URL helpers.

use reqwest::Client;

use super::parse_api_error;
use crate::media::ImageAttachment;
use crate::{Error, Result};

/// Bucket-scoped access to `/storage/v1`
#[derive(Clone)]
pub struct SupabaseStorage {
    storage_url: String,
    bucket: String,
    anon_key: String,
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SupabaseStorage")
            .field("storage_url", &self.storage_url)
            .field("bucket", &self.bucket)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseStorage {
    pub fn new(project_url: &str, bucket: &str, anon_key: &str) -> Result<Self> {
        let bucket = bucket.trim().trim_matches('/');
        if bucket.is_empty() {
            return Err(Error::InvalidConfiguration(
                "Storage bucket must not be empty".to_string(),
            ));
        }
        Ok(Self {
            storage_url: format!("{}/storage/v1", project_url.trim_end_matches('/')),
            bucket: bucket.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload endpoint for `object_path`
    pub fn object_url(&self, object_path: &str) -> Result<String> {
        let object_path = normalize_object_path(object_path)?;
        Ok(format!(
            "{}/object/{}/{}",
            self.storage_url,
            self.bucket,
            encode_object_path(&object_path)
        ))
    }

    /// Public read URL for `object_path`
    pub fn public_object_url(&self, object_path: &str) -> Result<String> {
        let object_path = normalize_object_path(object_path)?;
        Ok(format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            self.bucket,
            encode_object_path(&object_path)
        ))
    }

    /// Upload `image` and return its public URL.
    pub async fn upload(
        &self,
        client: &Client,
        object_path: &str,
        image: &ImageAttachment,
    ) -> Result<String> {
        let url = self.object_url(object_path)?;
        tracing::debug!(
            "Uploading {} bytes to {}/{}",
            image.bytes.len(),
            self.bucket,
            object_path
        );

        let response = client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Content-Type", image.upload_content_type())
            .header("x-upsert", "false")
            .body(image.bytes.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "upload to bucket '{}' failed: {}",
                self.bucket,
                parse_api_error(status, &body)
            )));
        }

        self.public_object_url(object_path)
    }
}

fn normalize_object_path(object_path: &str) -> Result<String> {
    let object_path = object_path.trim().trim_matches('/').to_string();
    if object_path.is_empty() {
        return Err(Error::InvalidInput(
            "Storage object path cannot be empty".to_string(),
        ));
    }
    Ok(object_path)
}

fn encode_object_path(object_path: &str) -> String {
    object_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
