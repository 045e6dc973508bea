use std::env;
use std::fmt;
use std::time::Duration;

use crate::constants::{
    EDIT_API_URL, EDIT_MODEL_VERSION, EDIT_PROVIDER_NAME, EDIT_TIMEOUT, HEALTH_TIMEOUT,
    IMAGE_API_URL, IMAGE_MODEL, IMAGE_PROVIDER_NAME, IMAGE_TIMEOUT, TEXT_API_URL, TEXT_MODEL,
    TEXT_PROVIDER_NAME, TEXT_TIMEOUT,
};
use crate::error::{StudioError, StudioResult};
use crate::fetch::RetryPolicy;

/// One external provider, as loaded at startup.
#[derive(Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub base_endpoint: String,
    pub model: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(name: &str, base_endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            base_endpoint: base_endpoint.to_string(),
            model: model.to_string(),
            auth_token: None,
            timeout,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn has_credential(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_endpoint", &self.base_endpoint)
            .field("model", &self.model)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Process-wide configuration. Loaded once in `main` and handed to
/// [`crate::Studio`]; nothing below this reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub text: ProviderConfig,
    pub image: ProviderConfig,
    pub edit: ProviderConfig,
    pub health_timeout: Duration,
    pub verify_images: bool,
    pub verify_retry: RetryPolicy,
    pub edit_poll: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: ProviderConfig::new(TEXT_PROVIDER_NAME, TEXT_API_URL, TEXT_MODEL, TEXT_TIMEOUT),
            image: ProviderConfig::new(
                IMAGE_PROVIDER_NAME,
                IMAGE_API_URL,
                IMAGE_MODEL,
                IMAGE_TIMEOUT,
            ),
            edit: ProviderConfig::new(
                EDIT_PROVIDER_NAME,
                EDIT_API_URL,
                EDIT_MODEL_VERSION,
                EDIT_TIMEOUT,
            ),
            health_timeout: HEALTH_TIMEOUT,
            verify_images: false,
            verify_retry: RetryPolicy::default(),
            edit_poll: RetryPolicy::new(6, Duration::from_secs(1)),
        }
    }
}

impl Config {
    pub fn from_env() -> StudioResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> StudioResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        apply_provider(&mut config.text, "TEXT", &lookup)?;
        apply_provider(&mut config.image, "IMAGE", &lookup)?;
        apply_provider(&mut config.edit, "EDIT", &lookup)?;

        if let Some(token) = lookup("GROQ_API_KEY") {
            config.text = config.text.with_token(token);
        }
        if let Some(token) = lookup("REPLICATE_API_TOKEN") {
            config.edit = config.edit.with_token(token);
        }
        if let Some(ms) = lookup("STUDIO_HEALTH_TIMEOUT_MS") {
            config.health_timeout = parse_millis("STUDIO_HEALTH_TIMEOUT_MS", &ms)?;
        }
        if let Some(flag) = lookup("STUDIO_VERIFY_IMAGES") {
            config.verify_images = parse_flag("STUDIO_VERIFY_IMAGES", &flag)?;
        }

        Ok(config)
    }
}

fn apply_provider<F>(provider: &mut ProviderConfig, prefix: &str, lookup: &F) -> StudioResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(&format!("STUDIO_{}_ENDPOINT", prefix)) {
        provider.base_endpoint = endpoint;
    }
    if let Some(model) = lookup(&format!("STUDIO_{}_MODEL", prefix)) {
        provider.model = model;
    }
    let timeout_key = format!("STUDIO_{}_TIMEOUT_MS", prefix);
    if let Some(ms) = lookup(&timeout_key) {
        provider.timeout = parse_millis(&timeout_key, &ms)?;
    }
    Ok(())
}

fn parse_millis(key: &str, value: &str) -> StudioResult<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| StudioError::Config(format!("{} must be a number of milliseconds", key)))
}

fn parse_flag(key: &str, value: &str) -> StudioResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(StudioError::Config(format!("{} must be true or false", key))),
    }
}
