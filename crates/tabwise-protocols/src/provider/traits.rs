//! Chat provider trait definition.

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse};
use crate::error::ProviderError;

/// Core trait for hosted chat-completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Generate assistant text for the last turn of `request.messages`.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}
