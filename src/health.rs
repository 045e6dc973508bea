use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::{Config, ProviderConfig};
use crate::constants::{EDIT_PROBE_PATH, TEXT_PROBE_PATH};
use crate::error::{StudioError, StudioResult};
use crate::fetch::{fetch_with_timeout, is_url_accessible};
use crate::utils::build_headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub text_completion: bool,
    pub image_generation: bool,
    pub image_edit: bool,
}

/// Probes every provider concurrently. Never fails; an unreachable or
/// unconfigured provider simply reports `false`.
pub async fn check_health(client: &Client, config: &Config) -> HealthReport {
    let timeout = config.health_timeout;
    let (text_completion, image_generation, image_edit) = futures::join!(
        probe_credentialed(client, &config.text, TEXT_PROBE_PATH, timeout),
        is_url_accessible(client, &config.image.base_endpoint, timeout),
        probe_credentialed(client, &config.edit, EDIT_PROBE_PATH, timeout),
    );

    HealthReport {
        text_completion,
        image_generation,
        image_edit,
    }
}

async fn probe_credentialed(
    client: &Client,
    provider: &ProviderConfig,
    path: &str,
    timeout: Duration,
) -> bool {
    let token = match provider.auth_token.as_deref() {
        Some(token) => token,
        None => return false,
    };
    match authorized_get(client, provider, path, token, timeout).await {
        Ok(()) => true,
        Err(err) => {
            log::warn!("health probe for {} failed: {}", provider.name, err);
            false
        }
    }
}

async fn authorized_get(
    client: &Client,
    provider: &ProviderConfig,
    path: &str,
    token: &str,
    timeout: Duration,
) -> StudioResult<()> {
    let request = client
        .get(provider.endpoint(path))
        .headers(build_headers(token)?)
        .build()?;
    let response = fetch_with_timeout(client, request, timeout).await?;
    if response.is_success() {
        Ok(())
    } else {
        Err(StudioError::upstream(
            &provider.name,
            response.status.as_u16(),
            response.body,
        ))
    }
}
