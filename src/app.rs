//! Component wiring for the CLI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use tabwise_assistant::{AssistantOptions, TabAssistant};
use tabwise_browser_memory::{BrowserState, MemoryBrowser};
use tabwise_config::{Config, ConfigLoader, ConfigSettingsStore};
use tabwise_protocols::browser::BrowserPorts;
use tabwise_protocols::store::ConversationStore;
use tabwise_provider_openai::OpenAIProvider;
use tabwise_runtime::{
    FileConversationStore, HistoryManager, MemoryConversationStore, RetryConfig, RetryProvider,
};

/// Default browser state file name under the data directory.
const STATE_FILE: &str = "browser.json";

/// Everything a command needs, built once per invocation.
pub(crate) struct App {
    pub state_path: PathBuf,
    pub browser: Arc<MemoryBrowser>,
    pub provider: Arc<OpenAIProvider>,
    pub settings: Arc<ConfigSettingsStore>,
    pub assistant: TabAssistant,
}

impl App {
    pub(crate) async fn build(
        config: Config,
        config_path: PathBuf,
        state_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let state_path = match state_path {
            Some(path) => path,
            None => ConfigLoader::data_dir()?.join(STATE_FILE),
        };
        let state = BrowserState::load(&state_path).await?;
        debug!(
            "Loaded browser state: {} tabs, {} history entries",
            state.tabs.len(),
            state.history.len()
        );
        let browser = Arc::new(MemoryBrowser::new(state));

        let provider = Arc::new(
            OpenAIProvider::new(config.api.api_key.clone())
                .with_base_url(config.api.base_url.clone())
                .with_model(config.api.model.clone())
                .with_timeout(Duration::from_secs(config.api.timeout_seconds)),
        );
        let gateway = Arc::new(RetryProvider::new(
            provider.clone(),
            RetryConfig::from(&config.retry),
        ));

        let history = Arc::new(HistoryManager::new(
            conversation_store(&config),
            config.history.max_turns,
        ));
        match history.load().await {
            Ok(n) => debug!("Restored {} conversation turns", n),
            Err(e) => warn!("Could not restore conversation history: {}", e),
        }

        let options = AssistantOptions::from(&config.assistant);
        let settings = Arc::new(ConfigSettingsStore::with_path(config, config_path));

        let assistant = TabAssistant::new(
            gateway,
            BrowserPorts::from_shared(browser.clone()),
            history,
            settings.clone(),
        )
        .with_options(options);

        Ok(Self {
            state_path,
            browser,
            provider,
            settings,
            assistant,
        })
    }

    /// Write the browser state back after commands with side effects.
    pub(crate) async fn save_state(&self) -> anyhow::Result<()> {
        self.browser.state().save(&self.state_path).await?;
        info!("Browser state saved to {}", self.state_path.display());
        Ok(())
    }
}

fn conversation_store(config: &Config) -> Arc<dyn ConversationStore> {
    match &config.history.path {
        Some(path) => Arc::new(FileConversationStore::new(ConfigLoader::expand_path(path))),
        None => Arc::new(MemoryConversationStore::new()),
    }
}
