//! In-memory conversation store implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;

use tabwise_protocols::error::StoreError;
use tabwise_protocols::store::ConversationStore;
use tabwise_protocols::types::ChatTurn;

/// In-memory conversation store; lives as long as the process.
#[derive(Default)]
pub struct MemoryConversationStore {
    turns: RwLock<Vec<ChatTurn>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn load(&self) -> Result<Vec<ChatTurn>, StoreError> {
        Ok(self.turns.read().await.clone())
    }

    async fn save(&self, turns: &[ChatTurn]) -> Result<(), StoreError> {
        *self.turns.write().await = turns.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.turns.write().await.clear();
        Ok(())
    }
}
