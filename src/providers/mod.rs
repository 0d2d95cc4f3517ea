pub mod openai;
pub mod relay;
pub mod traits;
pub mod utils;

use log::info;

use crate::config::AssistantConfig;
use openai::OpenAIProvider;
use relay::RelayProvider;
use traits::CompletionProvider;

/// OpenAI provider, when an API key is configured.
pub fn openai_from_config(config: &AssistantConfig, system_prompt: &str) -> Option<OpenAIProvider> {
    config.openai_api_key.as_ref().map(|api_key| {
        OpenAIProvider::new(api_key.clone(), system_prompt.to_string(), config.openai_chat_model.clone())
    })
}

/// Provider used for fallback delegation. A relay endpoint takes priority
/// over a direct OpenAI connection.
pub fn delegate_from_config(
    config: &AssistantConfig,
    system_prompt: &str,
) -> Option<Box<dyn CompletionProvider + Send + Sync>> {
    if let Some(url) = &config.ask_url {
        info!("Delegating unmatched messages to {}", url);
        return Some(Box::new(RelayProvider::new(url.clone())));
    }

    openai_from_config(config, system_prompt).map(|provider| {
        info!("Delegating unmatched messages to OpenAI ({})", config.openai_chat_model);
        Box::new(provider) as Box<dyn CompletionProvider + Send + Sync>
    })
}
