//! Completion response types.

use serde::{Deserialize, Serialize};

use crate::types::Usage;

/// Response from a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Model that produced the text.
    pub model: String,

    /// Generated assistant text.
    pub content: String,

    /// Token usage, when reported.
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            content: content.into(),
            usage: Usage::default(),
        }
    }

    /// The generated text.
    pub fn text(&self) -> &str {
        &self.content
    }
}
