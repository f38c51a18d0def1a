use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::message::ChatMessage;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_base: String, api_key: String, model: String, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::LanguageModel(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            api_base,
            api_key,
            model,
        })
    }

    fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let url = self.completions_endpoint();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };
        debug!(
            %url,
            model = %self.model,
            message_count = messages.len(),
            prompt_len = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "completion endpoint responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse completion response: {err}"))
        })?;
        info!(model = ?payload.model, choices = payload.choices.len(), "received completion");

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::LanguageModel("completion response contained no message".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(AppError::LanguageModel(
                "language model returned an empty completion".to_string(),
            ));
        }
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
