//! Bounded conversation history.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use tabwise_protocols::error::StoreError;
use tabwise_protocols::store::ConversationStore;
use tabwise_protocols::types::ChatTurn;

/// Default cap on stored turns.
pub const DEFAULT_MAX_TURNS: usize = 50;

/// Append-only conversation log with oldest-first eviction.
///
/// Appends are serialized through one async lock, and the store is
/// written after the in-memory update so a failing backend never leaves
/// a partially applied exchange behind.
pub struct HistoryManager {
    store: Arc<dyn ConversationStore>,
    max_turns: usize,
    turns: Mutex<Vec<ChatTurn>>,
}

impl HistoryManager {
    pub fn new(store: Arc<dyn ConversationStore>, max_turns: usize) -> Self {
        Self {
            store,
            max_turns: max_turns.max(1),
            turns: Mutex::new(Vec::new()),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Restore turns from the store, keeping the newest `max_turns`.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let mut stored = self.store.load().await?;
        truncate_oldest(&mut stored, self.max_turns);
        let count = stored.len();
        *self.turns.lock().await = stored;
        debug!("Loaded {} history turns", count);
        Ok(count)
    }

    /// Append a single turn.
    pub async fn append(&self, turn: ChatTurn) {
        let mut turns = self.turns.lock().await;
        turns.push(turn);
        truncate_oldest(&mut turns, self.max_turns);
        self.persist(&turns).await;
    }

    /// Append a user turn and its reply as one unit.
    pub async fn append_exchange(&self, user: ChatTurn, assistant: ChatTurn) {
        let mut turns = self.turns.lock().await;
        turns.push(user);
        turns.push(assistant);
        truncate_oldest(&mut turns, self.max_turns);
        self.persist(&turns).await;
    }

    /// The last `n` turns, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<ChatTurn> {
        let turns = self.turns.lock().await;
        let start = turns.len().saturating_sub(n);
        turns[start..].to_vec()
    }

    /// Every stored turn, oldest first.
    pub async fn all(&self) -> Vec<ChatTurn> {
        self.turns.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.turns.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.lock().await.is_empty()
    }

    /// Drop every turn, in memory and in the store.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut turns = self.turns.lock().await;
        turns.clear();
        self.store.clear().await
    }

    async fn persist(&self, turns: &[ChatTurn]) {
        if let Err(e) = self.store.save(turns).await {
            warn!("Failed to persist conversation history: {}", e);
        }
    }
}

fn truncate_oldest(turns: &mut Vec<ChatTurn>, cap: usize) {
    if turns.len() > cap {
        let excess = turns.len() - cap;
        turns.drain(..excess);
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
