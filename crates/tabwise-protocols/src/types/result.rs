//! Result returned to the UI for each assistant request.

use serde::{Deserialize, Serialize};

use super::intent::{ActionKind, TabCategory};

/// Outcome class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Action,
    Message,
    Error,
}

/// What an invocation did. `execution_result` describes side effects that
/// were actually performed, which may be fewer than the model requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,

    pub message: String,

    #[serde(default)]
    pub execution_result: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<TabCategory>>,
}

impl ExecutionResult {
    pub fn action(
        action: ActionKind,
        message: impl Into<String>,
        execution_result: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResultKind::Action,
            action: Some(action),
            message: message.into(),
            execution_result: execution_result.into(),
            categories: None,
        }
    }

    /// Plain conversational reply; nothing was executed.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Message,
            action: None,
            message: text.into(),
            execution_result: String::new(),
            categories: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Error,
            action: None,
            message: text.into(),
            execution_result: String::new(),
            categories: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<TabCategory>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResultKind::Error
    }

    /// Text shown to the user: the message followed by the execution summary.
    pub fn display_text(&self) -> String {
        match (self.message.trim(), self.execution_result.trim()) {
            ("", "") => String::new(),
            (message, "") => message.to_string(),
            ("", summary) => summary.to_string(),
            (message, summary) => format!("{}\n\n{}", message, summary),
        }
    }
}
