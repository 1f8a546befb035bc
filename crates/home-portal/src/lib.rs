// crates/home-portal/src/lib.rs
// ============================================================================
// Module: Home Portal
// Description: Minimal self-hosted web application serving a home page.
// Purpose: Provide the home view handler, HTTP server, and configuration.
// Dependencies: axum, serde, thiserror, tokio, toml
// ============================================================================

//! ## Overview
//! Home Portal serves a single home page over HTTP. The default action of
//! [`handlers::HomeHandler`] renders the home view; the server wires that
//! handler into an [`axum`] router together with health and readiness
//! endpoints. Configuration is loaded from TOML and fails closed on invalid
//! input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod handlers;
pub mod server;
pub mod telemetry;
pub mod views;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestAuditEvent;
pub use audit::RequestAuditSink;
pub use audit::StderrAuditSink;
pub use config::AuditConfig;
pub use config::ConfigError;
pub use config::PortalConfig;
pub use config::ServerConfig;
pub use config::SiteConfig;
pub use config::SiteLink;
pub use handlers::HomeHandler;
pub use server::PortalServer;
pub use server::PortalServerError;
pub use server::ReadinessProbe;
pub use server::ViewReadinessProbe;
pub use telemetry::NoopMetrics;
pub use telemetry::PORTAL_LATENCY_BUCKETS_MS;
pub use telemetry::RequestMetricEvent;
pub use telemetry::RequestMetrics;
pub use telemetry::RequestOutcome;
pub use telemetry::Route;
pub use views::ViewResult;
