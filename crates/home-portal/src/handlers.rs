// crates/home-portal/src/handlers.rs
// ============================================================================
// Module: Portal Handlers
// Description: Request handlers dispatched by the portal server.
// Purpose: Provide the home handler whose default action renders the index view.
// Dependencies: home-portal views, config
// ============================================================================

//! ## Overview
//! [`HomeHandler`] is the request-handling unit behind the portal's default
//! route. Its default action [`HomeHandler::index`] always yields a rendered
//! [`ViewResult`]; the handler is stateless across invocations and cheap to
//! construct.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::SiteConfig;
use crate::views::ViewResult;
use crate::views::render_home;

// ============================================================================
// SECTION: Home Handler
// ============================================================================

/// Handler for the portal's default route.
///
/// # Invariants
/// - Holds no mutable state; every invocation renders from the same site
///   configuration.
#[derive(Debug, Clone, Default)]
pub struct HomeHandler {
    /// Site configuration used for rendering.
    site: SiteConfig,
}

impl HomeHandler {
    /// Creates a handler from site configuration.
    #[must_use]
    pub const fn new(site: SiteConfig) -> Self {
        Self {
            site,
        }
    }

    /// Default action: renders the index view.
    ///
    /// Always yields a view result with a non-empty body for any valid site
    /// configuration, including the default one.
    #[must_use]
    pub fn index(&self) -> ViewResult {
        render_home(&self.site)
    }

    /// Returns the site configuration backing this handler.
    #[must_use]
    pub const fn site(&self) -> &SiteConfig {
        &self.site
    }
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

    use crate::config::SiteConfig;
    use crate::views::HOME_VIEW_NAME;

    use super::HomeHandler;

    #[test]
    fn default_handler_index_returns_view_result() {
        let handler = HomeHandler::default();
        let result = handler.index();
        assert_eq!(result.view_name(), HOME_VIEW_NAME);
        assert!(!result.html().is_empty());
    }

    #[test]
    fn index_is_stable_across_invocations() {
        let handler = HomeHandler::new(SiteConfig::default());
        let first = handler.index();
        let second = handler.index();
        assert_eq!(first, second);
    }

    #[test]
    fn index_renders_configured_title() {
        let site = SiteConfig {
            title: "Build Dashboard".to_string(),
            ..SiteConfig::default()
        };
        let handler = HomeHandler::new(site);
        assert!(handler.index().html().contains("Build Dashboard"));
    }
}
