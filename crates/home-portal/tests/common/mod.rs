// crates/home-portal/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared test utilities and fixtures for portal tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: home-portal
// ============================================================================

//! ## Overview
//! This module provides shared fixtures and sample configurations for use
//! across the portal integration test files.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use home_portal::PortalConfig;
use home_portal::SiteConfig;
use home_portal::config::SiteLink;

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Creates a default portal config for testing.
#[must_use]
pub fn sample_config() -> PortalConfig {
    PortalConfig::default()
}

/// Creates a site config with a tagline and links.
#[must_use]
pub fn sample_site() -> SiteConfig {
    SiteConfig {
        title: "Team Portal".to_string(),
        tagline: Some("internal landing page".to_string()),
        links: vec![
            SiteLink {
                label: "health".to_string(),
                href: "/health".to_string(),
            },
            SiteLink {
                label: "docs".to_string(),
                href: "https://example.com/docs".to_string(),
            },
        ],
    }
}
