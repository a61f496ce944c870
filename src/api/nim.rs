// NVIDIA NIM API client for proxying chat completions

use std::time::Duration;

use crate::error::ProxyError;
use crate::proxy::translator::{NimChatRequest, NimChatResponse};

pub const NIM_API_BASE: &str = "https://integrate.api.nvidia.com/v1";

#[derive(Clone)]
pub struct NimClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for NimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NimClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NimClient {
    pub fn new(api_key: String, base_url: String, timeout: Option<Duration>) -> Result<Self, ProxyError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            base_url,
            http_client: builder.build()?,
        })
    }

    /// Send one non-retried chat completion request
    pub async fn chat_completions(&self, payload: &NimChatRequest) -> Result<NimChatResponse, ProxyError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProxyError::upstream(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ProxyError::Decode(e.to_string()))
    }
}
