// crates/home-portal/src/telemetry.rs
// ============================================================================
// Module: Portal Telemetry
// Description: Observability hooks for portal request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for portal request counters
//! and latency histograms. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for portal request histograms.
pub const PORTAL_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Portal route classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Home page route.
    Home,
    /// Liveness route.
    Health,
    /// Readiness route.
    Ready,
}

impl Route {
    /// Returns a stable label for the route.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Health => "health",
            Self::Ready => "ready",
        }
    }
}

/// Portal request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

impl RequestOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Portal request metric event payload.
///
/// # Invariants
/// - `response_bytes` reflects the rendered body size, not wire framing.
#[derive(Debug, Clone)]
pub struct RequestMetricEvent {
    /// Route serving the request.
    pub route: Route,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// HTTP status code of the response.
    pub status: u16,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for portal requests and latencies.
pub trait RequestMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: RequestMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: RequestMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl RequestMetrics for NoopMetrics {
    fn record_request(&self, _event: RequestMetricEvent) {}

    fn record_latency(&self, _event: RequestMetricEvent, _latency: Duration) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions."
    )]

    use super::PORTAL_LATENCY_BUCKETS_MS;
    use super::RequestOutcome;
    use super::Route;

    #[test]
    fn route_labels_are_stable() {
        assert_eq!(Route::Home.as_str(), "home");
        assert_eq!(Route::Health.as_str(), "health");
        assert_eq!(Route::Ready.as_str(), "ready");
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(RequestOutcome::Ok.as_str(), "ok");
        assert_eq!(RequestOutcome::Error.as_str(), "error");
    }

    #[test]
    fn serialized_labels_match_stable_labels() {
        for route in [Route::Home, Route::Health, Route::Ready] {
            let value = serde_json::to_value(route).expect("serialize route");
            assert_eq!(value, serde_json::Value::String(route.as_str().to_string()));
        }
        for outcome in [RequestOutcome::Ok, RequestOutcome::Error] {
            let value = serde_json::to_value(outcome).expect("serialize outcome");
            assert_eq!(value, serde_json::Value::String(outcome.as_str().to_string()));
        }
    }

    #[test]
    fn latency_buckets_are_sorted() {
        let mut sorted = PORTAL_LATENCY_BUCKETS_MS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted.as_slice(), PORTAL_LATENCY_BUCKETS_MS);
    }
}
