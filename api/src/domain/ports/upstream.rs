//! Upstream HTTP service ports
//!
//! The URY API (membership signup, colleges) and team blog feeds.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

/// Client for the companion URY API server
#[async_trait]
pub trait UryApi: Send + Sync {
    /// GET a resource; the API key is added to `params`
    async fn get(&self, resource: &str, params: &[(String, String)])
        -> Result<Value, UpstreamError>;

    /// POST a form to a resource; the API key is added to `form`
    async fn post(&self, resource: &str, form: &[(String, String)])
        -> Result<Value, UpstreamError>;
}

/// Fetches raw RSS/Atom documents
#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, UpstreamError>;
}
