//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use tabwise_protocols::error::ProviderError;
use tabwise_protocols::provider::{ChatProvider, CompletionRequest, CompletionResponse};
use tabwise_protocols::types::Message;

use crate::api::{error_message, ApiMessage, ApiRequest, ApiResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Outcome of [`OpenAIProvider::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Chat provider for OpenAI and compatible endpoints.
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    /// Point at an OpenAI-compatible API root such as `https://host/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &CompletionRequest) -> ApiRequest {
        ApiRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: request.messages.iter().map(ApiMessage::from).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(api_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status.as_u16(), &body))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout.as_secs())
        } else {
            ProviderError::Network(error.to_string())
        }
    }

    /// Send a tiny probe completion and report whether the API answered.
    pub async fn test_connection(&self) -> ConnectionTestResult {
        info!("Testing connection to {} with model {}", self.base_url, self.model);
        let probe = CompletionRequest::new(vec![Message::user("Hello")]).with_max_tokens(10);

        match self.complete(probe).await {
            Ok(_) => ConnectionTestResult {
                success: true,
                message: "Connection successful".to_string(),
                model: Some(self.model.clone()),
            },
            Err(e) => {
                warn!("Connection test failed: {}", e);
                ConnectionTestResult {
                    success: false,
                    message: e.to_string(),
                    model: None,
                }
            }
        }
    }
}

fn map_status(status: u16, body: &str) -> ProviderError {
    let message = error_message(status, body);
    match status {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        429 => ProviderError::RateLimited(message),
        400 | 404 | 422 => ProviderError::InvalidRequest(message),
        _ => ProviderError::ApiError { status, message },
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Please set the API key in settings".to_string(),
            ));
        }

        let api_request = self.build_request(&request);
        debug!(
            "POST {} model={} messages={}",
            self.endpoint(),
            api_request.model,
            api_request.messages.len()
        );

        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let model = api_response.model.unwrap_or(api_request.model);
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("response contained no message content".to_string()))?;

        let mut completion = CompletionResponse::new(model, content);
        if let Some(usage) = api_response.usage {
            completion.usage = usage.into();
        }
        Ok(completion)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
