//! Gateway request metrics.
//!
//! Records through the `metrics` facade; the embedding process decides which
//! exporter (if any) to install.

use metrics::{counter, histogram};
use reqwest::Method;

/// Record the outcome of one gateway call.
///
/// Records the following metrics:
/// - `gateway_requests_total`: Counter with labels (method, route, outcome)
/// - `gateway_request_duration_seconds`: Histogram with labels (method, route)
pub fn record_request(method: &Method, route: &'static str, outcome: &'static str, duration_secs: f64) {
    let method_str = method_to_str(method);

    counter!(
        "gateway_requests_total",
        "method" => method_str,
        "route" => route,
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "method" => method_str,
        "route" => route
    )
    .record(duration_secs);
}

/// Record a retry of a failed attempt.
pub fn record_retry(method: &Method, route: &'static str) {
    counter!(
        "gateway_retries_total",
        "method" => method_to_str(method),
        "route" => route
    )
    .increment(1);
}

/// Record a read that joined an identical in-flight request.
pub fn record_coalesced(route: &'static str) {
    counter!("gateway_coalesced_total", "route" => route).increment(1);
}

/// Convert HTTP method to string for metric labels.
fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}
