//! HTTP client abstraction for the language-model boundary.
//!
//! The assist module talks to its API through this trait so tests can
//! inject canned responses instead of making network requests.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Trait for HTTP communication with external APIs.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body and returns the response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String>;
}

/// Production implementation backed by reqwest.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String> {
        let mut request = self.client.post(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        let response = request.json(body).send().await?;
        Ok(response.text().await?)
    }
}
