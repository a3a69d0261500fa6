//! Assistant errors.

use thiserror::Error;

use tabwise_protocols::error::{BrowserError, ProviderError, StoreError};

/// Anything that can abort a request before a result is produced.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AssistantError {
    /// Missing or rejected credentials.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AssistantError::Provider(e) if e.is_configuration())
    }
}
