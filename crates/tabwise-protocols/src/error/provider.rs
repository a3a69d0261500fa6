//! Chat provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials or endpoint missing; fatal to the request.
    #[error("API is not configured: {0}")]
    NotConfigured(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the error stems from missing or rejected credentials.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::NotConfigured(_) | ProviderError::AuthenticationFailed(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status, .. } => Some(*status),
            ProviderError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
