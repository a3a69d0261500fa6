//! File-based conversation store implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use tabwise_protocols::error::StoreError;
use tabwise_protocols::store::ConversationStore;
use tabwise_protocols::types::ChatTurn;

/// Stores the conversation as a pretty-printed JSON array.
pub struct FileConversationStore {
    path: PathBuf,
}

impl FileConversationStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn load(&self) -> Result<Vec<ChatTurn>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = tokio::fs::read_to_string(&self.path).await?;
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, turns: &[ChatTurn]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(turns)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Saved {} turns to {:?}", turns.len(), self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            tokio::fs::remove_file(&self.path).await?;
            debug!("Deleted history file: {:?}", self.path);
        }
        Ok(())
    }
}
