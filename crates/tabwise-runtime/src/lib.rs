//! # tabwise runtime
//!
//! Provider retry, bounded conversation history and its persistence.

pub mod conversation_store;
pub mod history;
pub mod retry;

pub use conversation_store::{FileConversationStore, MemoryConversationStore};
pub use history::{HistoryManager, DEFAULT_MAX_TURNS};
pub use retry::{is_retryable, RetryConfig, RetryProvider};
