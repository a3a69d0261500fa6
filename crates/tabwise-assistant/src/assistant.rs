//! Request orchestration: snapshot, prompt, model call, parse, execute.

use std::sync::Arc;

use tracing::{debug, error, info};

use tabwise_config::AssistantConfig;
use tabwise_protocols::browser::BrowserPorts;
use tabwise_protocols::error::ProviderError;
use tabwise_protocols::provider::{ChatProvider, CompletionRequest};
use tabwise_protocols::store::SettingsStore;
use tabwise_protocols::types::{ChatTurn, ExecutionResult, Intent, Message};
use tabwise_runtime::HistoryManager;

use crate::error::AssistantError;
use crate::executor::ActionExecutor;
use crate::intent::parse_intent;
use crate::prompt::build_assistant_prompt_with_context;
use crate::snapshot::SnapshotProvider;

/// Generation parameters for assistant requests.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Recent turns embedded as conversational context.
    pub context_turns: usize,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1500,
            context_turns: 6,
        }
    }
}

impl From<&AssistantConfig> for AssistantOptions {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            context_turns: config.context_turns,
        }
    }
}

/// The assistant core. Requests may run concurrently; the only shared
/// mutable state is the history log, which serializes its own appends.
pub struct TabAssistant {
    pub(crate) provider: Arc<dyn ChatProvider>,
    pub(crate) ports: BrowserPorts,
    pub(crate) snapshot: SnapshotProvider,
    pub(crate) executor: ActionExecutor,
    pub(crate) history: Arc<HistoryManager>,
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) options: AssistantOptions,
}

impl TabAssistant {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        ports: BrowserPorts,
        history: Arc<HistoryManager>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            provider,
            snapshot: SnapshotProvider::new(ports.clone()),
            executor: ActionExecutor::new(ports.clone()),
            ports,
            history,
            settings,
            options: AssistantOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssistantOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AssistantOptions {
        &self.options
    }

    /// Handle one free-text request. Never fails: every error becomes an
    /// `error`-typed result. The exchange is recorded in history once the
    /// result is known.
    pub async fn handle_request(&self, user_text: &str) -> ExecutionResult {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return ExecutionResult::error("Please enter a request.");
        }

        info!("Assistant request: {}", user_text);
        let context = self.history.recent(self.options.context_turns).await;

        let (result, details) = match self.run_pipeline(user_text, &context).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to process request: {}", e);
                (
                    ExecutionResult::error(format!("Failed to process request: {e}")),
                    None,
                )
            }
        };

        let mut reply = ChatTurn::assistant(result.display_text(), result.kind);
        if let Some(intent) = details {
            reply = reply.with_details(intent);
        }
        self.history
            .append_exchange(ChatTurn::user(user_text), reply)
            .await;

        result
    }

    /// Snapshot, prompt, complete, parse, execute.
    ///
    /// A reply that is not a JSON intent is shown verbatim. A JSON reply
    /// whose `action` is missing or unknown shows the model's `message`
    /// field instead, falling back to the raw reply only when that field
    /// is empty.
    async fn run_pipeline(
        &self,
        user_text: &str,
        context: &[ChatTurn],
    ) -> Result<(ExecutionResult, Option<Intent>), AssistantError> {
        let tabs = self.snapshot.snapshot_tabs().await?;
        let bookmarks = self.snapshot.snapshot_bookmark_summary().await?;

        let messages = build_assistant_prompt_with_context(&tabs, bookmarks, context, user_text);
        let raw = self
            .complete(messages, self.options.temperature, self.options.max_tokens)
            .await?;
        debug!("Model reply: {}", raw);

        let intent = match parse_intent(&raw) {
            Ok(intent) => intent,
            Err(failure) => return Ok((ExecutionResult::message(failure.into_raw()), None)),
        };

        let result = if intent.kind().is_none() {
            let text = match intent.message_text() {
                "" => raw.trim(),
                message => message,
            };
            ExecutionResult::message(text)
        } else {
            self.executor.execute(&intent, &tabs).await?
        };

        Ok((result, Some(intent)))
    }

    /// Send `messages` and return the generated text.
    pub(crate) async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(messages)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);
        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }

    /// The full conversation log, oldest first.
    pub async fn history(&self) -> Vec<ChatTurn> {
        self.history.all().await
    }

    pub async fn clear_history(&self) -> Result<(), AssistantError> {
        self.history.clear().await?;
        info!("Conversation history cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "assistant_tests.rs"]
mod tests;
