// src/utils/http.rs

//! HTTP client utilities.
//!
//! The pipeline only ever performs `GET` requests that return JSON. That
//! capability is expressed by [`RestClient`] so the services can be driven by
//! a canned client in tests.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;
use crate::models::HttpConfig;

/// Perform a `GET` and hand back the response body.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Fetch `url`, failing on transport errors and non-success statuses.
    async fn get_text(&self, url: &Url) -> Result<String>;
}

#[async_trait]
impl RestClient for reqwest::Client {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let text = self
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

/// Fetch `url` and deserialize the JSON body.
///
/// A literal `null` body yields `Ok(None)`.
pub async fn get_json<T: DeserializeOwned>(client: &dyn RestClient, url: &Url) -> Result<Option<T>> {
    let body = client.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

#[cfg(test)]
pub(crate) use stub::StubClient;
