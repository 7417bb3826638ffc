//! URY API client implementation
//!
//! The companion API server expects its key as a request parameter on every
//! call, in the query string for GETs and in the form body for POSTs.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::domain::ports::UryApi;
use crate::error::UpstreamError;

/// Parameter name used for the key when website.yml names none
const DEFAULT_KEY_PARAM: &str = "api_key";

/// Implementation of the URY API client
pub struct UryApiClient {
    http: Client,
    api_root: String,
    api_key: String,
    key_param: String,
}

impl UryApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: Client::new(),
            api_root: config.api_root.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            key_param: config
                .param_name("api-key")
                .unwrap_or(DEFAULT_KEY_PARAM)
                .to_string(),
        }
    }

    fn api_url(&self, resource: &str) -> String {
        format!("{}/{}", self.api_root, resource.trim_start_matches('/'))
    }

    /// `params` with the API key added, replacing any caller-supplied key
    fn with_key(&self, params: &[(String, String)]) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = params
            .iter()
            .filter(|(name, _)| *name != self.key_param)
            .cloned()
            .collect();
        merged.push((self.key_param.clone(), self.api_key.clone()));
        merged
    }

    async fn handle_response(
        &self,
        resource: &str,
        response: reqwest::Response,
    ) -> Result<Value, UpstreamError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| UpstreamError::Deserialization(e.to_string()))
        } else if status.as_u16() == 404 {
            Err(UpstreamError::NotFound(resource.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl UryApi for UryApiClient {
    async fn get(
        &self,
        resource: &str,
        params: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        tracing::debug!("URY API GET {}", resource);
        let resp = self
            .http
            .get(self.api_url(resource))
            .query(&self.with_key(params))
            .send()
            .await?;

        self.handle_response(resource, resp).await
    }

    async fn post(
        &self,
        resource: &str,
        form: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        tracing::debug!("URY API POST {}", resource);
        let resp = self
            .http
            .post(self.api_url(resource))
            .form(&self.with_key(form))
            .send()
            .await?;

        self.handle_response(resource, resp).await
    }
}
