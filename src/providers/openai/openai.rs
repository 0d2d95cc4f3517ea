use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::providers::traits::CompletionProvider;
use async_openai::{
    types::{
        CreateChatCompletionRequestArgs,
        ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent,
        Role,
    },
    Client,
    config::OpenAIConfig,
};

/// Chat-completion provider answering as the restaurant assistant.
#[derive(Clone)]
pub struct OpenAIProvider {
    system_message: String,
    client: Client<OpenAIConfig>,
    chat_model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, system_message: String, chat_model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            system_message,
            client: Client::with_config(config),
            chat_model,
        }
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(vec![
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage {
                        role: Role::System,
                        content: self.system_message.clone(),
                        name: None,
                    }
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        role: Role::User,
                        content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                        name: None,
                    }
                ),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        response.choices.first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("No response content"))
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.chat_model.clone())
    }
}
