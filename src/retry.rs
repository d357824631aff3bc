//! Retry with exponential backoff for outbound HTTP requests.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::theme;

/// Backoff schedule for transient HTTP failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first request.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Symmetric jitter ratio (0.0..=1.0) applied to each delay.
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter_ratio: 0.20,
        }
    }
}

impl RetryPolicy {
    /// Backoff for the given 1-based retry index, doubling up to `max_delay`.
    pub fn backoff_delay(&self, retry_index: u32) -> Duration {
        let shift = retry_index.saturating_sub(1).min(31);
        let delay = self
            .base_delay
            .checked_mul(1u32 << shift)
            .unwrap_or(self.max_delay);
        delay.min(self.max_delay)
    }

    /// Apply symmetric random jitter to a delay.
    pub fn with_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_ratio <= 0.0 {
            return delay;
        }
        let ratio = self.jitter_ratio.clamp(0.0, 1.0);
        let millis = delay.as_millis() as f64;
        let spread = millis * ratio;
        let low = (millis - spread).max(0.0);
        let high = millis + spread;
        let sampled = if high <= low {
            low
        } else {
            rand::random::<f64>() * (high - low) + low
        };
        Duration::from_millis(sampled.round() as u64)
    }
}

/// Why a failed attempt is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientCause {
    RateLimited,
    ServerError,
    RequestTimeout,
    Timeout,
    Connect,
}

impl TransientCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::RequestTimeout => "request_timeout",
            Self::Timeout => "timeout",
            Self::Connect => "connect",
        }
    }
}

/// Parse a `Retry-After` header value as a delay.
///
/// Supports delta-seconds (`Retry-After: 5`) and HTTP-date
/// (`Retry-After: Wed, 21 Oct 2015 07:28:00 GMT`).
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let raw = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim();

    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    if let Ok(when) = httpdate::parse_http_date(raw) {
        let now = std::time::SystemTime::now();
        if let Ok(delay) = when.duration_since(now) {
            return Some(delay);
        }
        return Some(Duration::from_secs(0));
    }

    None
}

/// Classify one attempt's outcome.  `None` means do not retry.  A server
/// `Retry-After` header overrides the computed backoff when present.
fn classify(
    result: &std::result::Result<reqwest::Response, reqwest::Error>,
) -> Option<(TransientCause, Option<Duration>)> {
    match result {
        Ok(resp) => {
            let status = resp.status();
            let cause = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                TransientCause::RateLimited
            } else if status == reqwest::StatusCode::REQUEST_TIMEOUT {
                TransientCause::RequestTimeout
            } else if status.is_server_error() {
                TransientCause::ServerError
            } else {
                return None;
            };
            Some((cause, parse_retry_after(resp.headers())))
        }
        Err(err) if err.is_timeout() => Some((TransientCause::Timeout, None)),
        Err(err) if err.is_connect() || err.is_request() => {
            Some((TransientCause::Connect, None))
        }
        Err(_) => None,
    }
}

/// Send an HTTP request, retrying transient failures with exponential
/// backoff and jitter.
///
/// The last attempt's outcome is returned as-is; non-transient statuses are
/// handed back to the caller for context-specific handling.  `label` names
/// the caller in retry announcements on stderr.
pub async fn send_with_retry(
    builder: reqwest::RequestBuilder,
    policy: &RetryPolicy,
    label: &str,
) -> Result<reqwest::Response> {
    let Some(template) = builder.try_clone() else {
        // Non-cloneable request body (streaming): cannot safely retry.
        return builder.send().await.context("HTTP request failed");
    };

    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let request = template
            .try_clone()
            .context("retry template should remain cloneable")?;
        let result = request.send().await;

        if attempt < max_attempts {
            if let Some((cause, retry_after)) = classify(&result) {
                let base = retry_after.unwrap_or_else(|| policy.backoff_delay(attempt));
                let delay = policy.with_jitter(base);
                eprintln!(
                    "{}",
                    theme::icon_warn(&format!(
                        "{}: transient error ({}) on attempt {}, retrying in {:?}",
                        label,
                        cause.as_str(),
                        attempt,
                        delay,
                    ))
                );
                tokio::time::sleep(delay).await;
                continue;
            }
        }

        return result.with_context(|| format!("{label}: HTTP request failed"));
    }

    unreachable!("retry loop always returns");
}
