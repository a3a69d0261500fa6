//! Provider retry and error handling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use tabwise_config::RetrySettings;
use tabwise_protocols::error::ProviderError;
use tabwise_protocols::provider::{ChatProvider, CompletionRequest, CompletionResponse};

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call.
    pub max_retries: u32,
    /// Base delay between retries.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Exponential backoff multiplier.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            ..Default::default()
        }
    }
}

impl RetryConfig {
    /// Calculate delay for a given attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = delay.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(delay as u64)
    }
}

/// Check if an error is retryable.
///
/// Rate limiting is surfaced to the user rather than retried.
pub fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::Network(_) => true,
        ProviderError::Timeout(_) => true,
        ProviderError::ApiError { status, .. } => (500..600).contains(status),
        _ => false,
    }
}

/// Provider wrapper with retry capability.
pub struct RetryProvider {
    inner: Arc<dyn ChatProvider>,
    config: RetryConfig,
}

impl RetryProvider {
    /// Create a new retry provider.
    pub fn new(provider: Arc<dyn ChatProvider>, config: RetryConfig) -> Self {
        Self {
            inner: provider,
            config,
        }
    }

    /// Get inner provider.
    pub fn inner(&self) -> &Arc<dyn ChatProvider> {
        &self.inner
    }
}

#[async_trait]
impl ChatProvider for RetryProvider {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        debug!("Completing with retry: {} messages", request.messages.len());
        let mut attempt = 0;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if !is_retryable(&e) || attempt >= self.config.max_retries {
                        return Err(e);
                    }

                    let delay = self.config.delay_for_attempt(attempt);
                    warn!(
                        "Provider error (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        self.config.max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
