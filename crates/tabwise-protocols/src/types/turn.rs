//! Conversation log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::message::Message;
use super::result::ResultKind;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,

    pub content: String,

    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResultKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Intent>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            kind: None,
            details: None,
        }
    }

    pub fn assistant(content: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            kind: Some(kind),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Intent) -> Self {
        self.details = Some(details);
        self
    }

    /// Convert to a chat message for conversational context.
    pub fn to_message(&self) -> Message {
        match self.role {
            TurnRole::User => Message::user(self.content.clone()),
            TurnRole::Assistant => Message::assistant(self.content.clone()),
        }
    }
}
