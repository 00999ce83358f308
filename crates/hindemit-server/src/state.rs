use std::path::PathBuf;
use std::sync::Arc;

use hindemit_openrouter::client::{OpenRouter, ProviderConfig};
use hindemit_openrouter::provider::ChatProvider;

use crate::config::ServerConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured.
    pub provider: Option<Arc<dyn ChatProvider>>,
    pub chat_system_prompt: Arc<str>,
    pub suggestions_file: Option<PathBuf>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> eyre::Result<Self> {
        let provider = match &config.api_key {
            Some(key) => {
                let provider_config = ProviderConfig::new(key.clone())
                    .with_base_url(config.base_url.clone())
                    .with_timeout(config.request_timeout);
                Some(Arc::new(OpenRouter::new(provider_config)?) as Arc<dyn ChatProvider>)
            }
            None => None,
        };

        Ok(Self {
            provider,
            chat_system_prompt: Arc::from(config.chat_system_prompt.as_str()),
            suggestions_file: config.suggestions_file.clone(),
        })
    }
}
