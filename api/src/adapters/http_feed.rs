//! Blog feed client over HTTP

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::ports::FeedClient;
use crate::error::UpstreamError;

/// Fetches RSS/Atom documents with reqwest
pub struct HttpFeedClient {
    http: Client,
}

impl HttpFeedClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for HttpFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch(&self, url: &str) -> Result<String, UpstreamError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status.is_success() {
            Ok(resp.text().await?)
        } else if status.as_u16() == 404 {
            Err(UpstreamError::NotFound(url.to_string()))
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
