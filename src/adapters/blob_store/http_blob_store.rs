//! HTTP Blob Store Adapter
//!
//! Talks to an object store exposing plain HTTP semantics: `PUT
//! {upload_base_url}/{path}` with a bearer token writes an object, and the
//! object is then publicly readable at `{public_base_url}/{path}`. This fits
//! GCS/S3 style buckets fronted by a signing proxy as well as simple CDN
//! origins.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::ports::{BlobStore, BlobStoreError};

/// Configuration for [`HttpBlobStore`].
#[derive(Debug, Clone)]
pub struct HttpBlobStoreConfig {
    pub upload_base_url: String,
    pub public_base_url: String,
    access_token: Option<SecretString>,
    pub timeout: Duration,
}

impl HttpBlobStoreConfig {
    pub fn new(upload_base_url: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            upload_base_url: trim_slash(upload_base_url.into()),
            public_base_url: trim_slash(public_base_url.into()),
            access_token: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Blob store over HTTP.
pub struct HttpBlobStore {
    config: HttpBlobStoreConfig,
    client: Client,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobStoreConfig) -> Result<Self, BlobStoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BlobStoreError::transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn object_path(path: &str) -> &str {
        path.trim_start_matches('/')
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.upload_base_url, Self::object_path(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.public_base_url, Self::object_path(path))
    }
}

fn map_transport(e: reqwest::Error) -> BlobStoreError {
    if e.is_timeout() {
        BlobStoreError::transport("request timed out")
    } else if e.is_connect() {
        BlobStoreError::transport(format!("connection failed: {}", e))
    } else {
        BlobStoreError::transport(e.to_string())
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, bytes: Vec<u8>, path: &str, content_type: &str) -> Result<String, BlobStoreError> {
        let mut request = self
            .client
            .put(self.upload_url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, path = %path, "Blob upload rejected");
            return Err(BlobStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(path))
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, BlobStoreError> {
        let response = self.client.get(url).send().await.map_err(map_transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlobStoreError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.bytes().await.map_err(map_transport)?;
        Ok(body.to_vec())
    }
}
