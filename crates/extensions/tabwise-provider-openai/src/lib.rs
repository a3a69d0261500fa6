//! OpenAI-compatible chat provider for tabwise.

mod api;
mod provider;

pub use provider::{ConnectionTestResult, OpenAIProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
