// crates/home-portal/src/audit.rs
// ============================================================================
// Module: Portal Audit Logging
// Description: Structured audit events for portal request handling.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for portal request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::telemetry::RequestOutcome;
use crate::telemetry::Route;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Portal request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Route serving the request.
    pub route: Route,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// HTTP status code of the response.
    pub status: u16,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

/// Inputs required to construct a request audit event.
pub struct RequestAuditEventParams {
    /// Route serving the request.
    pub route: Route,
    /// Peer IP address if known.
    pub peer_ip: Option<String>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// HTTP status code of the response.
    pub status: u16,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

impl RequestAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RequestAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "portal_request",
            timestamp_ms,
            route: params.route,
            peer_ip: params.peer_ip,
            outcome: params.outcome,
            status: params.status,
            response_bytes: params.response_bytes,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for portal request events.
pub trait RequestAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RequestAuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RequestAuditSink for FileAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that discards all events.
pub struct NoopAuditSink;

impl RequestAuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
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

    use std::fs;

    use crate::telemetry::RequestOutcome;
    use crate::telemetry::Route;

    use super::FileAuditSink;
    use super::RequestAuditEvent;
    use super::RequestAuditEventParams;
    use super::RequestAuditSink;

    fn sample_event() -> RequestAuditEvent {
        RequestAuditEvent::new(RequestAuditEventParams {
            route: Route::Home,
            peer_ip: Some("127.0.0.1".to_string()),
            outcome: RequestOutcome::Ok,
            status: 200,
            response_bytes: 42,
        })
    }

    #[test]
    fn audit_event_serializes_with_stable_label() {
        let event = sample_event();
        let payload = serde_json::to_string(&event).expect("serialize");
        assert!(payload.contains("\"event\":\"portal_request\""));
        assert!(payload.contains("\"route\":\"home\""));
        assert!(payload.contains("\"outcome\":\"ok\""));
        assert!(payload.contains("\"status\":200"));
    }

    #[test]
    fn file_sink_appends_one_json_line_per_event() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("audit.log");
        let sink = FileAuditSink::new(&path).expect("open sink");
        sink.record(&sample_event());
        sink.record(&sample_event());
        let contents = fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).expect("json line");
            assert_eq!(value["event"], "portal_request");
        }
    }
}
