//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "ollama", "replicate")
//! - `operation` — capability invoked (e.g. "chat", "tts", "image")
//! - `status` — outcome: "ok" or "error"

/// Total capability requests dispatched.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "muninn_requests_total";

/// Request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "muninn_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`, `operation`.
pub const RETRIES_TOTAL: &str = "muninn_retries_total";

/// Total local-provider attempts that failed and fell through to a
/// remote provider.
///
/// Labels: `operation`.
pub const LOCAL_FALLBACKS_TOTAL: &str = "muninn_local_fallbacks_total";
