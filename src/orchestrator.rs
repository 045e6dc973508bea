use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::constants::VIDEO_NOTE;
use crate::edit::{EditKind, SourceImage};
use crate::enhancer::PromptEnhancer;
use crate::error::{StudioError, StudioResult};
use crate::health::{check_health, HealthReport};
use crate::images::{GenerationRequest, TaskKind};
use crate::providers::{
    GenerationJob, PlaceholderProvider, PredictionEditProvider, ProviderChain, UrlImageProvider,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    /// URL or `data:` URL. Empty only when `success` is false.
    pub output: String,
    pub provider: String,
    pub enhanced_prompt: String,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point for every capability: enhance, build, then walk the
/// provider chain for that capability.
pub struct Studio {
    client: Client,
    config: Config,
    enhancer: PromptEnhancer,
    image_chain: ProviderChain,
    video_chain: ProviderChain,
    edit_chain: ProviderChain,
}

impl Studio {
    pub fn new(client: Client, config: Config) -> Self {
        let enhancer = PromptEnhancer::new(client.clone(), config.text.clone());
        let image_chain = ProviderChain::new().then(url_provider(&client, &config));
        let video_chain = ProviderChain::new().then(url_provider(&client, &config));
        let edit_chain = ProviderChain::new()
            .then(PredictionEditProvider::new(
                client.clone(),
                config.edit.clone(),
                config.edit_poll,
            ))
            .then(url_provider(&client, &config))
            .then(PlaceholderProvider);

        Self {
            client,
            config,
            enhancer,
            image_chain,
            video_chain,
            edit_chain,
        }
    }

    pub fn with_image_chain(mut self, chain: ProviderChain) -> Self {
        self.image_chain = chain;
        self
    }

    pub fn with_edit_chain(mut self, chain: ProviderChain) -> Self {
        self.edit_chain = chain;
        self
    }

    pub async fn enhance(&self, prompt: &str, task: TaskKind) -> String {
        self.enhancer.enhance(prompt, task).await
    }

    pub async fn generate_image(&self, prompt: &str) -> StudioResult<GenerationResult> {
        require_prompt(prompt)?;
        let request = GenerationRequest::new(prompt, TaskKind::Image);
        Ok(self.run(&self.image_chain, request, None).await)
    }

    /// Produces a single representative frame, not a moving picture; the
    /// result's `note` always says so.
    pub async fn generate_video(&self, prompt: &str) -> StudioResult<GenerationResult> {
        require_prompt(prompt)?;
        let request = GenerationRequest::new(prompt, TaskKind::Video);
        let mut result = self.run(&self.video_chain, request, None).await;
        result.note = Some(VIDEO_NOTE.to_string());
        Ok(result)
    }

    /// Always yields something renderable once the input is valid.
    pub async fn edit_image(
        &self,
        image: &SourceImage,
        instruction: &str,
        kind: EditKind,
    ) -> StudioResult<GenerationResult> {
        require_prompt(instruction)?;
        let request = GenerationRequest::new(instruction, kind.task());
        Ok(self.run(&self.edit_chain, request, Some(image.clone())).await)
    }

    pub async fn check_health(&self) -> HealthReport {
        check_health(&self.client, &self.config).await
    }

    async fn run(
        &self,
        chain: &ProviderChain,
        request: GenerationRequest,
        source_image: Option<SourceImage>,
    ) -> GenerationResult {
        let enhanced = self
            .enhancer
            .enhance(request.raw_prompt(), request.task())
            .await;
        let enhanced_prompt = if enhanced.trim().is_empty() {
            request.raw_prompt().to_string()
        } else {
            enhanced
        };

        let job = GenerationJob {
            request,
            prompt: enhanced_prompt,
            source_image,
        };

        match chain.run(&job).await {
            Ok(success) => GenerationResult {
                success: true,
                output: success.output.output,
                provider: success.provider,
                enhanced_prompt: job.prompt,
                used_fallback: success.used_fallback,
                seed: success.output.seed,
                note: success.output.note,
                error: None,
            },
            Err(err) => {
                log::error!("{} generation failed: {}", job.request.task(), err);
                GenerationResult {
                    success: false,
                    output: String::new(),
                    provider: "none".to_string(),
                    enhanced_prompt: job.prompt,
                    used_fallback: false,
                    seed: None,
                    note: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

fn url_provider(client: &Client, config: &Config) -> UrlImageProvider {
    let provider = UrlImageProvider::new(client.clone(), &config.image);
    if config.verify_images {
        provider.verified(config.verify_retry)
    } else {
        provider
    }
}

fn require_prompt(prompt: &str) -> StudioResult<()> {
    if prompt.trim().is_empty() {
        Err(StudioError::EmptyPrompt)
    } else {
        Ok(())
    }
}
