use async_trait::async_trait;

use crate::domain::message::ChatMessage;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// One non-streaming chat completion; returns the first choice's text.
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String>;
}
