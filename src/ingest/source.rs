//! Where descriptor text comes from: local files or HTTP.
//!
//! `HttpDescriptorSource::from_env` reads `COURSEPACK_FETCH_TOKEN`, sent as a
//! bearer token when set (for LMS endpoints that require auth).

use std::future::Future;
use std::path::Path;

use reqwest::Client;

use super::IngestError;

/// Fetches raw descriptor text from a location.
pub trait DescriptorSource: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, IngestError>> + Send;
}

pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsDescriptorSource;

impl DescriptorSource for FsDescriptorSource {
    async fn fetch(&self, location: &str) -> Result<String, IngestError> {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|e| IngestError::io(Path::new(location), e))
    }
}

#[derive(Debug, Clone)]
pub struct HttpDescriptorSource {
    client: Client,
    token: Option<String>,
}

impl HttpDescriptorSource {
    pub fn from_env() -> Self {
        Self::new(std::env::var("COURSEPACK_FETCH_TOKEN").ok())
    }

    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            token,
        }
    }
}

impl DescriptorSource for HttpDescriptorSource {
    async fn fetch(&self, location: &str) -> Result<String, IngestError> {
        let mut req = self.client.get(location);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                status,
                url: location.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Dispatches on the location: `http(s)://` goes over HTTP, anything else is a
/// local path.
#[derive(Debug, Clone)]
pub struct AnySource {
    fs: FsDescriptorSource,
    http: HttpDescriptorSource,
}

impl AnySource {
    pub fn new(http: HttpDescriptorSource) -> Self {
        Self {
            fs: FsDescriptorSource,
            http,
        }
    }

    pub fn from_env() -> Self {
        Self::new(HttpDescriptorSource::from_env())
    }
}

impl DescriptorSource for AnySource {
    async fn fetch(&self, location: &str) -> Result<String, IngestError> {
        if is_remote(location) {
            self.http.fetch(location).await
        } else {
            self.fs.fetch(location).await
        }
    }
}
