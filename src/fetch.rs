use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, Request, Response, StatusCode};

use crate::error::{StudioError, StudioResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// A response whose body has been read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub body: String,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends `request` and reads the whole body, giving up once `timeout`
/// elapses. The deadline covers the body too; the in-flight call is dropped
/// on expiry rather than left pending.
pub async fn fetch_with_timeout(
    client: &Client,
    request: Request,
    timeout: Duration,
) -> StudioResult<FetchedResponse> {
    let endpoint = request.url().to_string();
    let exchange = async {
        let response = client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, StudioError>(FetchedResponse { status, body })
    };
    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => Err(StudioError::Timeout { endpoint, timeout }),
    }
}

/// Like [`fetch_with_timeout`] but stops at the status line; the body is
/// never read.
async fn send_with_timeout(
    client: &Client,
    request: Request,
    timeout: Duration,
) -> StudioResult<Response> {
    let endpoint = request.url().to_string();
    match tokio::time::timeout(timeout, client.execute(request)).await {
        Ok(response) => Ok(response?),
        Err(_) => Err(StudioError::Timeout { endpoint, timeout }),
    }
}

/// Runs `operation` up to `max_attempts` times (at least once), sleeping
/// `initial_delay`, then twice that, and so on between attempts. The last
/// error is returned once attempts run out.
pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut delay = initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                log::warn!(
                    "attempt {}/{} failed: {}; retrying in {}ms",
                    attempt,
                    max_attempts,
                    err,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

pub async fn retry_with_policy<T, E, F, Fut>(operation: F, policy: RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_backoff(operation, policy.max_attempts, policy.initial_delay).await
}

/// HEAD first; some hosts reject HEAD, so a failed HEAD is retried as GET.
pub async fn verify_reachable(client: &Client, url: &str, timeout: Duration) -> StudioResult<u16> {
    match probe(client, Method::HEAD, url, timeout).await {
        Ok(status) => Ok(status),
        Err(head_err) => {
            log::debug!("HEAD {} failed ({}), trying GET", url, head_err);
            probe(client, Method::GET, url, timeout).await
        }
    }
}

pub async fn is_url_accessible(client: &Client, url: &str, timeout: Duration) -> bool {
    verify_reachable(client, url, timeout).await.is_ok()
}

async fn probe(client: &Client, method: Method, url: &str, timeout: Duration) -> StudioResult<u16> {
    let request = client.request(method, url).build()?;
    let response = send_with_timeout(client, request, timeout).await?;
    let status = response.status();
    if status.is_success() {
        Ok(status.as_u16())
    } else {
        Err(StudioError::upstream(url, status.as_u16(), ""))
    }
}

pub fn log_api_usage(
    provider: &str,
    endpoint: &str,
    status: Option<u16>,
    elapsed: Duration,
    is_fallback: bool,
) {
    let level = if is_fallback {
        log::Level::Warn
    } else {
        log::Level::Info
    };
    log::log!(
        level,
        "provider={} endpoint={} status={} elapsed_ms={} fallback={}",
        provider,
        endpoint,
        status.map_or_else(|| "-".to_string(), |s| s.to_string()),
        elapsed.as_millis(),
        is_fallback
    );
}
