//! Subcommand implementations and shared wiring

pub mod chat;
pub mod focus;
pub mod meeting;
pub mod sessions;

use anyhow::{Context, Result};
use scholar_application::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use scholar_infrastructure::{
    FileConfig, JsonlConversationLogger, OpenAiCompatClient, SqliteSessionStore,
};
use std::sync::Arc;

/// Shared dependencies, built once from the loaded configuration.
pub struct AppContext {
    pub config: FileConfig,
    pub client: Arc<OpenAiCompatClient>,
    pub store: SqliteSessionStore,
    pub logger: Arc<dyn ConversationLogger>,
}

impl AppContext {
    pub async fn build(config: FileConfig) -> Result<Self> {
        let api_key = std::env::var(&config.provider.api_key_env).with_context(|| {
            format!(
                "API key environment variable {} is not set",
                config.provider.api_key_env
            )
        })?;

        let client = Arc::new(
            OpenAiCompatClient::new(&config.provider.base_url, api_key)
                .map_err(|e| anyhow::anyhow!("could not build provider client: {e}"))?,
        );

        let store = SqliteSessionStore::connect(&config.storage.db_path)
            .await
            .map_err(|e| anyhow::anyhow!("could not open session store: {e}"))?;

        let logger: Arc<dyn ConversationLogger> = match &config.storage.log_path {
            Some(path) => match JsonlConversationLogger::new(path) {
                Some(l) => Arc::new(l),
                None => Arc::new(NoConversationLogger),
            },
            None => Arc::new(NoConversationLogger),
        };

        Ok(Self {
            config,
            client,
            store,
            logger,
        })
    }
}
