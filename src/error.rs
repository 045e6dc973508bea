use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between a user action and a provider.
///
/// Only the validation variants ever reach a caller of [`crate::Studio`];
/// the rest are absorbed into a fallback, a degraded prompt or a failed
/// [`crate::GenerationResult`].
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("{provider}: no credential configured")]
    MissingCredential { provider: String },

    #[error("{provider} responded with HTTP {status}: {body}")]
    UpstreamNonOk {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("request to {endpoint} timed out after {}ms", .timeout.as_millis())]
    Timeout { endpoint: String, timeout: Duration },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response from {provider}: {detail}")]
    MalformedResponse { provider: String, detail: String },

    #[error("{provider} job failed: {detail}")]
    JobFailed { provider: String, detail: String },

    #[error("{provider} job {id} is still running")]
    JobPending { provider: String, id: String },

    #[error("Please enter a prompt")]
    EmptyPrompt,

    #[error("Please upload an image file")]
    MissingImage,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no provider available for {0}")]
    NoProviderAvailable(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StudioError {
    pub fn upstream(provider: &str, status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamNonOk {
            provider: provider.to_string(),
            status,
            body: body.into(),
        }
    }

    pub fn malformed(provider: &str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            detail: detail.into(),
        }
    }

    pub fn missing_credential(provider: &str) -> Self {
        Self::MissingCredential {
            provider: provider.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamNonOk { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Input rejected before any network attempt.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPrompt | Self::MissingImage | Self::InvalidImage(_)
        )
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
