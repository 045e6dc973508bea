use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;

use crate::config::ProviderConfig;
use crate::constants::{
    EDIT_PREDICTIONS_PATH, PLACEHOLDER_NOTE, PLACEHOLDER_PROVIDER_NAME, REGENERATION_NOTE,
};
use crate::edit::{Prediction, PredictionRequest, SourceImage};
use crate::error::{StudioError, StudioResult};
use crate::fetch::{
    fetch_with_timeout, log_api_usage, retry_with_policy, verify_reachable, FetchedResponse,
    RetryPolicy,
};
use crate::images::{GenerationRequest, RequestBuilder};
use crate::placeholder::placeholder_data_url;
use crate::utils::build_headers;

/// What a provider is asked to produce.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub request: GenerationRequest,
    /// The prompt after enhancement; never empty.
    pub prompt: String,
    pub source_image: Option<SourceImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutput {
    /// An http(s) URL or a `data:` URL.
    pub output: String,
    pub endpoint: String,
    pub status: Option<u16>,
    pub seed: Option<u32>,
    pub note: Option<String>,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    fn endpoint(&self) -> &str;

    /// False means the provider is skipped without any network attempt.
    fn is_available(&self) -> bool {
        true
    }

    async fn attempt(&self, job: &GenerationJob) -> StudioResult<ProviderOutput>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainSuccess {
    pub provider: String,
    pub output: ProviderOutput,
    pub used_fallback: bool,
}

/// Providers tried in order until one succeeds.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn GenerationProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<P: GenerationProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn run(&self, job: &GenerationJob) -> StudioResult<ChainSuccess> {
        let mut last_error = None;

        for (index, provider) in self.providers.iter().enumerate() {
            let is_fallback = index > 0;
            if !provider.is_available() {
                log::info!("skipping {}: not configured", provider.name());
                last_error = Some(StudioError::missing_credential(provider.name()));
                continue;
            }

            let started = Instant::now();
            match provider.attempt(job).await {
                Ok(output) if !output.output.is_empty() => {
                    log_api_usage(
                        provider.name(),
                        &output.endpoint,
                        output.status,
                        started.elapsed(),
                        is_fallback,
                    );
                    return Ok(ChainSuccess {
                        provider: provider.name().to_string(),
                        output,
                        used_fallback: is_fallback,
                    });
                }
                Ok(output) => {
                    log_api_usage(
                        provider.name(),
                        &output.endpoint,
                        output.status,
                        started.elapsed(),
                        is_fallback,
                    );
                    last_error = Some(StudioError::malformed(provider.name(), "empty output"));
                }
                Err(err) => {
                    log::warn!(
                        "provider={} endpoint={} status={} elapsed_ms={} fallback={} error={}",
                        provider.name(),
                        provider.endpoint(),
                        err.status().map_or_else(|| "-".to_string(), |s| s.to_string()),
                        started.elapsed().as_millis(),
                        is_fallback,
                        err
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| StudioError::NoProviderAvailable(job.request.task().to_string())))
    }
}

/// Image provider driven entirely by a templated URL. Edit jobs are turned
/// into a fresh generation from a descriptive prompt.
pub struct UrlImageProvider {
    name: String,
    base_endpoint: String,
    client: Client,
    builder: RequestBuilder,
    timeout: Duration,
    verify: Option<RetryPolicy>,
}

impl UrlImageProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            name: config.name.clone(),
            base_endpoint: config.base_endpoint.clone(),
            client,
            builder: RequestBuilder::new(config),
            timeout: config.timeout,
            verify: None,
        }
    }

    /// Probe every built URL before handing it out.
    pub fn verified(mut self, retry: RetryPolicy) -> Self {
        self.verify = Some(retry);
        self
    }
}

#[async_trait]
impl GenerationProvider for UrlImageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> &str {
        &self.base_endpoint
    }

    async fn attempt(&self, job: &GenerationJob) -> StudioResult<ProviderOutput> {
        let task = job.request.task();
        let edit_kind = task.edit_kind();
        let prompt = match edit_kind {
            Some(kind) => kind.describe(&job.prompt),
            None => job.prompt.clone(),
        };

        let built = self.builder.build_seeded(
            &prompt,
            job.request.dimensions(),
            task.style_suffix(),
            job.request.seed(),
        )?;
        let url = built.url.to_string();

        let status = match self.verify {
            Some(policy) => {
                let status = retry_with_policy(
                    || verify_reachable(&self.client, &url, self.timeout),
                    policy,
                )
                .await?;
                Some(status)
            }
            None => None,
        };

        Ok(ProviderOutput {
            endpoint: url.clone(),
            output: url,
            status,
            seed: Some(built.seed),
            note: edit_kind.map(|_| REGENERATION_NOTE.to_string()),
        })
    }
}

/// Instruction-based editing through a prediction-job API. Only tried when a
/// credential is configured.
pub struct PredictionEditProvider {
    client: Client,
    config: ProviderConfig,
    endpoint: String,
    poll: RetryPolicy,
}

impl PredictionEditProvider {
    pub fn new(client: Client, config: ProviderConfig, poll: RetryPolicy) -> Self {
        Self {
            client,
            endpoint: config.endpoint(EDIT_PREDICTIONS_PATH),
            config,
            poll,
        }
    }

    async fn fetch_prediction(&self, url: &str, token: &str) -> StudioResult<Prediction> {
        let request = self
            .client
            .get(url)
            .headers(build_headers(token)?)
            .build()?;
        let response = fetch_with_timeout(&self.client, request, self.config.timeout).await?;
        self.read_prediction(response)
    }

    async fn poll_until_done(&self, url: &str, token: &str) -> StudioResult<Prediction> {
        let prediction = self.fetch_prediction(url, token).await?;
        if prediction.is_terminal() {
            Ok(prediction)
        } else {
            Err(StudioError::JobPending {
                provider: self.config.name.clone(),
                id: prediction.id,
            })
        }
    }

    fn read_prediction(&self, response: FetchedResponse) -> StudioResult<Prediction> {
        if !response.is_success() {
            return Err(StudioError::upstream(
                &self.config.name,
                response.status.as_u16(),
                response.body,
            ));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| StudioError::malformed(&self.config.name, e.to_string()))
    }
}

#[async_trait]
impl GenerationProvider for PredictionEditProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_available(&self) -> bool {
        self.config.has_credential()
    }

    async fn attempt(&self, job: &GenerationJob) -> StudioResult<ProviderOutput> {
        let token = self
            .config
            .auth_token
            .as_deref()
            .ok_or_else(|| StudioError::missing_credential(&self.config.name))?;
        let image = job.source_image.as_ref().ok_or(StudioError::MissingImage)?;

        let body = PredictionRequest::new(&self.config.model, image, &job.prompt);
        let request = self
            .client
            .post(&self.endpoint)
            .headers(build_headers(token)?)
            .header("Prefer", HeaderValue::from_static("wait"))
            .json(&body)
            .build()?;

        let response = fetch_with_timeout(&self.client, request, self.config.timeout).await?;
        let status = response.status.as_u16();
        let mut prediction = self.read_prediction(response)?;

        if !prediction.is_terminal() {
            let poll_url = prediction
                .poll_url()
                .map(str::to_string)
                .ok_or_else(|| StudioError::malformed(&self.config.name, "no polling URL"))?;
            prediction =
                retry_with_policy(|| self.poll_until_done(&poll_url, token), self.poll).await?;
        }

        if !prediction.succeeded() {
            return Err(StudioError::JobFailed {
                provider: self.config.name.clone(),
                detail: prediction.error_detail(),
            });
        }

        let output = prediction
            .first_output()
            .ok_or_else(|| StudioError::malformed(&self.config.name, "prediction has no output"))?;

        Ok(ProviderOutput {
            output,
            endpoint: self.endpoint.clone(),
            status: Some(status),
            seed: None,
            note: None,
        })
    }
}

/// Last resort: a locally rendered SVG carrying the user's own words.
#[derive(Debug, Default)]
pub struct PlaceholderProvider;

#[async_trait]
impl GenerationProvider for PlaceholderProvider {
    fn name(&self) -> &str {
        PLACEHOLDER_PROVIDER_NAME
    }

    fn endpoint(&self) -> &str {
        "local"
    }

    async fn attempt(&self, job: &GenerationJob) -> StudioResult<ProviderOutput> {
        Ok(ProviderOutput {
            output: placeholder_data_url(job.request.raw_prompt(), job.request.dimensions()),
            endpoint: "local".to_string(),
            status: None,
            seed: None,
            note: Some(PLACEHOLDER_NOTE.to_string()),
        })
    }
}
