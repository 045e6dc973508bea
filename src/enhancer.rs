use reqwest::Client;

use crate::chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::ProviderConfig;
use crate::constants::{TEXT_COMPLETIONS_PATH, TEXT_MAX_TOKENS, TEXT_TEMPERATURE};
use crate::error::{StudioError, StudioResult};
use crate::fetch::fetch_with_timeout;
use crate::images::TaskKind;
use crate::utils::build_headers;

/// Rewrites raw prompts through a text-completion provider.
///
/// Enhancement is best effort: [`PromptEnhancer::enhance`] hands back the
/// original prompt whenever the provider cannot be used, and makes exactly
/// one attempt.
#[derive(Debug, Clone)]
pub struct PromptEnhancer {
    client: Client,
    config: ProviderConfig,
}

impl PromptEnhancer {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    pub async fn enhance(&self, prompt: &str, task: TaskKind) -> String {
        if prompt.trim().is_empty() {
            return prompt.to_string();
        }
        match self.try_enhance(prompt, task).await {
            Ok(enhanced) => enhanced,
            Err(StudioError::MissingCredential { provider }) => {
                log::warn!("{} credential not found, using original prompt", provider);
                prompt.to_string()
            }
            Err(err) => {
                log::error!("prompt enhancement failed for {} task: {}", task, err);
                prompt.to_string()
            }
        }
    }

    pub async fn try_enhance(&self, prompt: &str, task: TaskKind) -> StudioResult<String> {
        let token = self
            .config
            .auth_token
            .as_deref()
            .ok_or_else(|| StudioError::missing_credential(&self.config.name))?;

        let body = build_enhance_request(prompt, task, &self.config.model);
        let request = self
            .client
            .post(self.config.endpoint(TEXT_COMPLETIONS_PATH))
            .headers(build_headers(token)?)
            .json(&body)
            .build()?;

        let response = fetch_with_timeout(&self.client, request, self.config.timeout).await?;
        if !response.is_success() {
            return Err(StudioError::upstream(
                &self.config.name,
                response.status.as_u16(),
                response.body,
            ));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|e| StudioError::malformed(&self.config.name, e.to_string()))?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| StudioError::malformed(&self.config.name, "empty completion"))
    }
}

pub fn build_enhance_request(prompt: &str, task: TaskKind, model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        messages: vec![
            ChatMessage::system(task.system_prompt()),
            ChatMessage::user(prompt),
        ],
        model: model.to_string(),
        temperature: TEXT_TEMPERATURE,
        max_tokens: TEXT_MAX_TOKENS,
    }
}
