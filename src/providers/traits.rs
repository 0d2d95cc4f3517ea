use async_trait::async_trait;
use std::any::Any;
use anyhow::Result;

/// Something that can answer a free-text message the rules could not.
#[async_trait]
pub trait CompletionProvider: Any + Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    async fn get_model_info(&self) -> Result<String>;
}
