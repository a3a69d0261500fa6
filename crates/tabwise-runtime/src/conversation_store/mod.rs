//! Conversation store implementations.

mod file_store;
mod memory_store;

pub use file_store::FileConversationStore;
pub use memory_store::MemoryConversationStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
