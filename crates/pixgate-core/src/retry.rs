use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use pixgate_common::RetryConfig;
use pixgate_protocol::upstream::GenerateImageRequestBody;
use rand::Rng;
use tracing::{info, warn};

use crate::context::RequestContext;
use crate::upstream_client::{
    UpstreamClient, UpstreamFailure, UpstreamHttpRequest, UpstreamHttpResponse,
    UpstreamTransportErrorKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub jitter_ceiling: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            jitter_ceiling: Duration::from_millis(config.jitter_ms),
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
        }
    }
}

impl RetryPolicy {
    /// `initial_backoff * 2^attempt_index`, without jitter.
    pub fn base_delay(&self, attempt_index: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(1u32 << attempt_index.min(16))
    }

    /// Delay slept after the attempt with index `attempt_index` (0-based)
    /// failed retryably.
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let jitter_ms = self.jitter_ceiling.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        self.base_delay(attempt_index) + Duration::from_millis(jitter)
    }
}

/// Where and how the upstream call is addressed.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoint {
    pub url: String,
    pub origin: Option<String>,
    pub user_agent: String,
}

/// Result of a full send, retries included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// 2xx reply; the body has not been inspected yet.
    Success { body: Bytes },
    /// Terminal 4xx, or the last retryable reply once attempts ran out.
    Failure { status: u16, body: Bytes },
}

enum AttemptVerdict {
    Success(Bytes),
    Terminal(Result<UpstreamOutcome, UpstreamFailure>),
    Retryable(Result<UpstreamOutcome, UpstreamFailure>),
}

fn judge(result: Result<UpstreamHttpResponse, UpstreamFailure>) -> AttemptVerdict {
    match result {
        Ok(resp) if resp.is_success() => AttemptVerdict::Success(resp.body),
        Ok(resp) => {
            let retryable = resp.status == 429 || resp.status >= 500;
            let failure = Ok(UpstreamOutcome::Failure {
                status: resp.status,
                body: resp.body,
            });
            if retryable {
                AttemptVerdict::Retryable(failure)
            } else {
                AttemptVerdict::Terminal(failure)
            }
        }
        Err(failure) => {
            let retryable = match &failure {
                UpstreamFailure::Transport { kind, .. } => kind.is_retryable(),
            };
            if retryable {
                AttemptVerdict::Retryable(Err(failure))
            } else {
                AttemptVerdict::Terminal(Err(failure))
            }
        }
    }
}

/// Sends translated payloads upstream with bounded retry, exponential backoff
/// and additive jitter.
///
/// 2xx ends the loop. 429, 5xx and retryable transport failures are retried
/// until `max_attempts` is reached; any other status is returned at once.
#[derive(Clone)]
pub struct ResilientClient {
    client: Arc<dyn UpstreamClient>,
    endpoint: UpstreamEndpoint,
    policy: RetryPolicy,
}

impl ResilientClient {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        endpoint: UpstreamEndpoint,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            endpoint,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn send(
        &self,
        payload: &GenerateImageRequestBody,
        ctx: &RequestContext,
    ) -> Result<UpstreamOutcome, UpstreamFailure> {
        let request = self.build_request(payload, ctx)?;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            let started_at = Instant::now();
            info!(
                event = "upstream_request",
                trace_id = %ctx.trace_id,
                provider = %payload.provider,
                model = %payload.model_id,
                attempt = attempt + 1,
                max_attempts = max_attempts
            );
            let result = self.attempt(request.clone()).await;
            log_attempt_result(ctx, &result, started_at.elapsed().as_millis());

            match judge(result) {
                AttemptVerdict::Success(body) => return Ok(UpstreamOutcome::Success { body }),
                AttemptVerdict::Terminal(last) => return last,
                AttemptVerdict::Retryable(last) => {
                    if attempt + 1 >= max_attempts {
                        warn!(
                            event = "upstream_exhausted",
                            trace_id = %ctx.trace_id,
                            attempts = max_attempts
                        );
                        return last;
                    }
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        event = "upstream_retry",
                        trace_id = %ctx.trace_id,
                        attempt = attempt + 1,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: UpstreamHttpRequest,
    ) -> Result<UpstreamHttpResponse, UpstreamFailure> {
        match tokio::time::timeout(self.policy.attempt_timeout, self.client.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamFailure::Transport {
                kind: UpstreamTransportErrorKind::Timeout,
                message: format!(
                    "no upstream response within {}s",
                    self.policy.attempt_timeout.as_secs()
                ),
            }),
        }
    }

    fn build_request(
        &self,
        payload: &GenerateImageRequestBody,
        ctx: &RequestContext,
    ) -> Result<UpstreamHttpRequest, UpstreamFailure> {
        let body = serde_json::to_vec(payload).map_err(|err| UpstreamFailure::Transport {
            kind: UpstreamTransportErrorKind::Other,
            message: format!("encode upstream payload: {err}"),
        })?;

        let mut headers = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "*/*".to_string()),
            ("user-agent".to_string(), self.endpoint.user_agent.clone()),
            ("x-request-id".to_string(), ctx.trace_id.clone()),
        ];
        if let Some(origin) = self.endpoint.origin.as_deref() {
            let origin = origin.trim_end_matches('/');
            headers.push(("origin".to_string(), origin.to_string()));
            headers.push(("referer".to_string(), format!("{origin}/")));
        }

        Ok(UpstreamHttpRequest {
            url: self.endpoint.url.clone(),
            headers,
            body: Bytes::from(body),
        })
    }
}

fn log_attempt_result(
    ctx: &RequestContext,
    result: &Result<UpstreamHttpResponse, UpstreamFailure>,
    elapsed_ms: u128,
) {
    match result {
        Ok(resp) => info!(
            event = "upstream_response",
            trace_id = %ctx.trace_id,
            status = resp.status,
            elapsed_ms = elapsed_ms
        ),
        Err(err) => warn!(
            event = "upstream_response",
            trace_id = %ctx.trace_id,
            status = "error",
            elapsed_ms = elapsed_ms,
            error = %err
        ),
    }
}
