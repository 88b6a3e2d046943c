use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Answers "would this image URL load?" for the renderer.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn load(&self, url: &str) -> bool;
}

/// Probes object storage with `HEAD` requests.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl Default for HttpImageProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn load(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!("Image not available at {}: HTTP {}", url, response.status());
                false
            }
            Err(e) => {
                tracing::debug!("Image probe for {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Probe that assumes every image loads, for renders without network checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeLoaded;

#[async_trait]
impl ImageProbe for AssumeLoaded {
    async fn load(&self, _url: &str) -> bool {
        true
    }
}
