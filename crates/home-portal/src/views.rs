// crates/home-portal/src/views.rs
// ============================================================================
// Module: Portal Views
// Description: View rendering for the home page.
// Purpose: Produce HTML view results from validated site configuration.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! Views are rendered from static template text with interpolated site
//! values. Rendering of the home view is total: every valid [`SiteConfig`]
//! yields a non-empty HTML body. Site values are HTML-escaped before
//! interpolation because configuration is untrusted input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::config::SiteConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type emitted for rendered views.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// View name of the home view.
pub const HOME_VIEW_NAME: &str = "index";

// ============================================================================
// SECTION: View Result
// ============================================================================

/// Rendered view payload returned by handler actions.
///
/// # Invariants
/// - `html` is non-empty for views produced by [`render_home`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewResult {
    /// Logical view name.
    view_name: String,
    /// Rendered HTML body.
    html: String,
}

impl ViewResult {
    /// Creates a view result from a name and rendered body.
    #[must_use]
    pub fn new(view_name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            html: html.into(),
        }
    }

    /// Returns the logical view name.
    #[must_use]
    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// Returns the rendered HTML body.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl IntoResponse for ViewResult {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, HTML_CONTENT_TYPE)], self.html).into_response()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the home view from site configuration.
#[must_use]
pub fn render_home(site: &SiteConfig) -> ViewResult {
    let title = escape_html(&site.title);
    let mut body = String::new();
    body.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    body.push_str("<meta charset=\"utf-8\">\n");
    body.push_str(&format!("<title>{title}</title>\n"));
    body.push_str("</head>\n<body>\n");
    body.push_str(&format!("<h1>{title}</h1>\n"));
    if let Some(tagline) = &site.tagline {
        body.push_str(&format!("<p>{}</p>\n", escape_html(tagline)));
    }
    if !site.links.is_empty() {
        body.push_str("<ul>\n");
        for link in &site.links {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape_html(&link.href),
                escape_html(&link.label)
            ));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</body>\n</html>\n");
    ViewResult::new(HOME_VIEW_NAME, body)
}

/// Escapes HTML metacharacters in untrusted text.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
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
    use crate::config::SiteLink;

    use super::HOME_VIEW_NAME;
    use super::escape_html;
    use super::render_home;

    #[test]
    fn escape_html_neutralizes_metacharacters() {
        let escaped = escape_html("<script>alert(\"x\") & 'y'</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn home_view_renders_non_empty_body() {
        let view = render_home(&SiteConfig::default());
        assert_eq!(view.view_name(), HOME_VIEW_NAME);
        assert!(!view.html().is_empty());
        assert!(view.html().contains("<h1>"));
    }

    #[test]
    fn home_view_escapes_site_values() {
        let site = SiteConfig {
            title: "<b>Portal</b>".to_string(),
            tagline: Some("a & b".to_string()),
            links: vec![SiteLink {
                label: "docs \"main\"".to_string(),
                href: "/docs".to_string(),
            }],
        };
        let view = render_home(&site);
        assert!(view.html().contains("&lt;b&gt;Portal&lt;/b&gt;"));
        assert!(view.html().contains("a &amp; b"));
        assert!(view.html().contains("docs &quot;main&quot;"));
        assert!(!view.html().contains("<b>"));
    }

    #[test]
    fn home_view_lists_configured_links() {
        let site = SiteConfig {
            title: "Portal".to_string(),
            tagline: None,
            links: vec![
                SiteLink {
                    label: "status".to_string(),
                    href: "/health".to_string(),
                },
                SiteLink {
                    label: "docs".to_string(),
                    href: "https://example.com/docs".to_string(),
                },
            ],
        };
        let view = render_home(&site);
        assert!(view.html().contains("<a href=\"/health\">status</a>"));
        assert!(view.html().contains("<a href=\"https://example.com/docs\">docs</a>"));
    }
}
