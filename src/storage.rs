use std::path::Path;
use std::time::Duration;
use anyhow::{Result, Context, anyhow};
use bytes::Bytes;
use log::{error, debug};
use reqwest::Client;
use url::Url;

// @module: HTTP object storage client

/// Client for a bucket on an HTTP object storage service
pub struct ObjectStorageClient {
    /// Base URL of the storage service
    base_url: String,
    /// Bucket name
    bucket: String,
    /// HTTP client for making requests
    client: Client,
}

impl ObjectStorageClient {
    /// Create a new client for the given service endpoint and bucket
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();

        // Add a scheme if the endpoint lacks one
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint
        } else {
            format!("https://{}", endpoint)
        };

        Self {
            base_url,
            bucket: bucket.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// URL addressing one object in the bucket
    pub fn object_url(&self, object_name: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid storage endpoint: {}", self.base_url))?;
        base.join(&format!("{}/{}", self.bucket, object_name))
            .with_context(|| format!("Invalid object name: {}", object_name))
    }

    /// Download an object into memory
    pub async fn download(&self, object_name: &str) -> Result<Bytes> {
        let url = self.object_url(object_name)?;
        debug!("Downloading object {} from {}", object_name, url);

        let response = self.client.get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Storage request failed for {}: {}", object_name, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Storage service returned {} for {}: {}", status, object_name, body);
            return Err(anyhow!(
                "Storage service returned {} for object {}",
                status, object_name
            ));
        }

        let bytes = response.bytes()
            .await
            .with_context(|| format!("Failed to read object body: {}", object_name))?;

        debug!("Read {} bytes from storage object {}", bytes.len(), object_name);
        Ok(bytes)
    }

    /// Download an object and write it to a local file
    pub async fn download_to_file<P: AsRef<Path>>(&self, object_name: &str, path: P) -> Result<u64> {
        let path = path.as_ref();
        let bytes = self.download(object_name).await?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write object to file: {}", path.display()))?;

        Ok(bytes.len() as u64)
    }

    /// Upload bytes as an object in the bucket
    pub async fn upload(&self, object_name: &str, content: Bytes) -> Result<()> {
        let url = self.object_url(object_name)?;
        debug!("Uploading {} bytes to {}", content.len(), url);

        let response = self.client.put(url)
            .body(content)
            .send()
            .await
            .map_err(|e| anyhow!("Storage upload failed for {}: {}", object_name, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Storage service returned {} for upload of {}: {}", status, object_name, body);
            return Err(anyhow!(
                "Storage service returned {} uploading object {}",
                status, object_name
            ));
        }

        Ok(())
    }
}
