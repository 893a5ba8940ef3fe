//! The gateway: one request primitive shared by every domain method.
//!
//! A call goes through these layers, outermost first:
//! cancellation, in-flight coalescing (GET only), retry with backoff, and a
//! per-attempt timeout around the transport. The response is then checked for
//! a 2xx status, decoded, and validated against its schema. Each failed call is
//! logged once at ERROR level and returned to the caller unchanged; callers
//! that joined a failed in-flight read log it at DEBUG instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::Schema;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::coalesce::InFlight;
use crate::config::Config;
use crate::error::GatewayError;
use crate::metrics;
use crate::query_keys::QueryKey;
use crate::retry::RetryPolicy;
use crate::transport::{ApiRequest, HttpTransport, RawResponse, Transport};

/// Header carrying the per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Per-attempt deadline used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for the campus administration backend.
///
/// Cloning is cheap and clones share the transport and the in-flight map.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    retry: RetryPolicy,
    inflight: Option<Arc<InFlight>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("coalesce_reads", &self.inflight.is_some())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Create a gateway over any transport with default timeout, retry policy
    /// and read coalescing enabled.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            inflight: Some(Arc::new(InFlight::new())),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a gateway talking HTTP to the configured backend.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(&config.gateway)?;
        debug!(base_url = %transport.base_url(), "Gateway transport ready");
        let retry = RetryPolicy::from_config(&config.retry)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        Ok(Self::new(Arc::new(transport))
            .with_timeout(Duration::from_millis(config.gateway.timeout_ms))
            .with_retry_policy(retry)
            .with_coalescing(config.gateway.coalesce_reads))
    }

    /// Deadline for a single attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable sharing of identical concurrent reads.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.inflight = enabled.then(|| Arc::new(InFlight::new()));
        self
    }

    /// A gateway whose calls fail with [`GatewayError::Cancelled`] once
    /// `token` fires. The returned value shares everything else with `self`.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Send `request` and decode a JSON body of type `T`.
    ///
    /// With a `key`, a GET joins an identical read already in flight.
    pub(crate) async fn request<T>(
        &self,
        key: Option<QueryKey>,
        request: ApiRequest,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Schema,
    {
        self.call(key, request, |raw| decode(&raw.body)).await
    }

    /// Send `request` for an operation that answers with no content.
    /// Any body is ignored.
    pub(crate) async fn request_empty(&self, request: ApiRequest) -> Result<(), GatewayError> {
        self.call(None, request, |_| Ok(())).await
    }

    /// Fail a call before anything is sent, logging and counting it like any
    /// other failure.
    pub(crate) fn reject(&self, method: &Method, route: &'static str, reason: String) -> GatewayError {
        let err = GatewayError::InvalidRequest(reason);
        metrics::record_request(method, route, err.kind(), 0.0);
        error!(
            method = %method,
            endpoint = route,
            kind = err.kind(),
            error = %err,
            "Gateway request failed"
        );
        err
    }

    async fn call<T, F>(
        &self,
        key: Option<QueryKey>,
        request: ApiRequest,
        parse: F,
    ) -> Result<T, GatewayError>
    where
        F: FnOnce(RawResponse) -> Result<T, GatewayError>,
    {
        let request_id = Uuid::new_v4().to_string();
        let request = request.with_header(REQUEST_ID_HEADER, request_id.clone());
        let span = info_span!(
            "gateway_request",
            request_id = %request_id,
            method = %request.method(),
            endpoint = %request.path_and_query(),
        );

        async move {
            let started = Instant::now();
            let (response, joined) = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => (Err(GatewayError::Cancelled), false),
                exchanged = self.exchange(key, &request) => exchanged,
            };
            let result = response.and_then(parse);
            let elapsed = started.elapsed();

            let outcome = match &result {
                Ok(_) => "ok",
                Err(err) => err.kind(),
            };
            metrics::record_request(request.method(), request.route(), outcome, elapsed.as_secs_f64());

            match &result {
                Ok(_) => debug!(duration_ms = millis(elapsed), "Gateway request completed"),
                // The caller that sent the shared request reports the failure.
                Err(err) if joined => debug!(
                    status = err.status(),
                    kind = err.kind(),
                    duration_ms = millis(elapsed),
                    error = %err,
                    "Joined failed in-flight request"
                ),
                Err(err) => error!(
                    endpoint = %request.path_and_query(),
                    status = err.status(),
                    kind = err.kind(),
                    duration_ms = millis(elapsed),
                    error = %err,
                    "Gateway request failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Send the request, sharing an identical in-flight GET when a key is
    /// given. Also reports whether the response came from another caller's
    /// round-trip.
    async fn exchange(
        &self,
        key: Option<QueryKey>,
        request: &ApiRequest,
    ) -> (Result<RawResponse, GatewayError>, bool) {
        if let (Some(key), Some(inflight)) = (key, self.inflight.as_ref()) {
            if *request.method() == Method::GET {
                let (outcome, joined) = inflight.share(key, || self.transmit(request)).await;
                if joined {
                    metrics::record_coalesced(request.route());
                }
                return (outcome, joined);
            }
        }
        (self.transmit(request).await, false)
    }

    /// Attempt the request until it succeeds, fails permanently, or the retry
    /// budget runs out.
    async fn transmit(&self, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        let mut retries = 0;
        loop {
            let attempt = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
                Ok(sent) => sent.and_then(RawResponse::error_for_status),
                Err(_) => Err(GatewayError::Timeout {
                    after_ms: millis(self.timeout),
                }),
            };

            match attempt {
                Ok(response) => return Ok(response),
                Err(err) if self.retry.should_retry(request.method(), &err, retries) => {
                    retries += 1;
                    let delay = self.retry.delay_for_retry(retries);
                    warn!(
                        attempt = retries,
                        max_retries = self.retry.max_retries,
                        delay_ms = millis(delay),
                        error = %err,
                        "Transient gateway failure, retrying"
                    );
                    metrics::record_retry(request.method(), request.route());
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn decode<T>(body: &[u8]) -> Result<T, GatewayError>
where
    T: DeserializeOwned + Schema,
{
    let value: T = serde_json::from_slice(body)?;
    value.check()?;
    Ok(value)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
