//! # tabwise Protocols
//!
//! Data model and capability traits shared by the tabwise crates.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`ChatProvider`] - Hosted chat-completion backend
//! - [`TabProvider`] - Open tab enumeration and removal
//! - [`BookmarkProvider`] - Bookmark tree access and mutation
//! - [`HistoryProvider`] - Browsing history search
//! - [`SettingsStore`] - Named configuration values
//! - [`ConversationStore`] - Persisted conversation log

pub mod browser;
pub mod error;
pub mod provider;
pub mod store;
pub mod types;

// Re-export core traits
pub use browser::{BookmarkProvider, BrowserPorts, HistoryProvider, TabProvider};
pub use error::{BrowserError, ProviderError, StoreError};
pub use provider::{ChatProvider, CompletionRequest, CompletionResponse};
pub use store::{ConversationStore, SettingsStore};
pub use types::*;
