//! Chat-specific metrics.
//!
//! Recorded through the `metrics` facade; rendered by the Prometheus
//! recorder installed in `service_core::observability`.

use metrics::{counter, histogram};
use std::time::Duration;

/// Request outcome labels for `chat_requests_total`.
pub mod outcome {
    pub const CREATOR_CLAIM: &str = "creator_claim";
    pub const NAME_DECLARED: &str = "name_declared";
    pub const MODEL: &str = "model";
    pub const DEGRADED: &str = "degraded";
    pub const INVALID: &str = "invalid";
    pub const ERROR: &str = "error";
}

pub fn record_chat_request(outcome: &'static str) {
    counter!("chat_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream_call(model: &str, elapsed: Duration, input_tokens: u32, output_tokens: u32) {
    let model = model.to_string();
    histogram!("chat_upstream_latency_seconds", "model" => model.clone())
        .record(elapsed.as_secs_f64());
    counter!("chat_tokens_total", "model" => model.clone(), "type" => "input")
        .increment(u64::from(input_tokens));
    counter!("chat_tokens_total", "model" => model, "type" => "output")
        .increment(u64::from(output_tokens));
}

pub fn record_upstream_failure(kind: &'static str) {
    counter!("chat_upstream_failures_total", "kind" => kind).increment(1);
}
