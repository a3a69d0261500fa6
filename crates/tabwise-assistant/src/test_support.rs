//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use tabwise_browser_memory::{BrowserState, MemoryBrowser};
use tabwise_config::{Config, ConfigSettingsStore};
use tabwise_protocols::browser::BrowserPorts;
use tabwise_protocols::error::ProviderError;
use tabwise_protocols::provider::{ChatProvider, CompletionRequest, CompletionResponse};
use tabwise_runtime::{HistoryManager, MemoryConversationStore};

use crate::assistant::TabAssistant;

/// Provider that replays queued replies and records every request.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    pub(crate) fn fail(self, error: ProviderError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().push(request);
        match self.replies.lock().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new("scripted-model", text)),
            Some(Err(e)) => Err(e),
            None => Err(ProviderError::InvalidResponse("no scripted reply left".to_string())),
        }
    }
}

/// An assistant wired to in-memory collaborators.
pub(crate) struct Harness {
    pub(crate) assistant: TabAssistant,
    pub(crate) provider: Arc<ScriptedProvider>,
    pub(crate) browser: Arc<MemoryBrowser>,
    pub(crate) store: Arc<MemoryConversationStore>,
}

impl Harness {
    pub(crate) fn new(state: BrowserState, provider: ScriptedProvider) -> Self {
        Self::with_config(state, provider, Config::default())
    }

    pub(crate) fn with_config(state: BrowserState, provider: ScriptedProvider, config: Config) -> Self {
        let provider = Arc::new(provider);
        let browser = Arc::new(MemoryBrowser::new(state));
        let store = Arc::new(MemoryConversationStore::new());
        let history = Arc::new(HistoryManager::new(store.clone(), config.history.max_turns));
        let settings = Arc::new(ConfigSettingsStore::new(config));

        let assistant = TabAssistant::new(
            provider.clone(),
            BrowserPorts::from_shared(browser.clone()),
            history,
            settings,
        );

        Self {
            assistant,
            provider,
            browser,
            store,
        }
    }
}
