use super::normalize::normalize;
use crate::core::error::IndicatorError;
use crate::core::indicator::{IndicatorRecord, IndicatorSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP client for the indicators backend (`GET /indicadores`, `POST /indicadores/uf`).
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ufdash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(BackendClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_body(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<String, IndicatorError> {
        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IndicatorError::connection(url, e))?;

        response
            .text()
            .await
            .map_err(|e| IndicatorError::connection(url, e))
    }
}

#[async_trait]
impl IndicatorSource for BackendClient {
    #[instrument(skip(self))]
    async fn fetch_indicators(&self) -> Result<Vec<IndicatorRecord>, IndicatorError> {
        let url = self.url("/indicadores");
        debug!("Requesting indicators from {}", url);

        let body = self.read_body(self.client.get(&url), &url).await?;
        normalize(&body)
    }

    #[instrument(skip(self))]
    async fn trigger_generation(&self) -> Result<Value, IndicatorError> {
        let url = self.url("/indicadores/uf");
        debug!("Requesting UF generation at {}", url);

        let body = self.read_body(self.client.post(&url), &url).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(body)),
        }
    }
}
