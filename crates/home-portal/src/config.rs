// crates/home-portal/src/config.rs
// ============================================================================
// Module: Portal Configuration
// Description: Configuration loading and validation for Home Portal.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed. Non-loopback bind addresses
//! require an explicit opt-in so a misconfigured portal never listens on a
//! public interface by accident.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "home-portal.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "HOME_PORTAL_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address for the HTTP server.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
/// Default site title when none is configured.
pub(crate) const DEFAULT_SITE_TITLE: &str = "Home Portal";
/// Maximum site title length in characters.
pub(crate) const MAX_TITLE_LENGTH: usize = 128;
/// Maximum site tagline length in characters.
pub(crate) const MAX_TAGLINE_LENGTH: usize = 512;
/// Maximum number of home page links.
pub(crate) const MAX_SITE_LINKS: usize = 64;
/// Maximum link label length in characters.
pub(crate) const MAX_LINK_LABEL_LENGTH: usize = 128;
/// Maximum link href length in characters.
pub(crate) const MAX_LINK_HREF_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Home Portal configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Site content configuration.
    #[serde(default)]
    pub site: SiteConfig,
    /// Request audit configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Optional config source metadata (not serialized).
    #[serde(skip)]
    pub source_modified_at: Option<SystemTime>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            audit: AuditConfig::default(),
            source_modified_at: None,
        }
    }
}

impl PortalConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_modified_at = fs::metadata(&resolved).and_then(|meta| meta.modified()).ok();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.site.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address in `host:port` form.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Whether non-loopback bind addresses are permitted.
    #[serde(default)]
    pub allow_non_loopback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            allow_non_loopback: false,
        }
    }
}

impl ServerConfig {
    /// Validates server settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when settings are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let addr = self.bind_addr()?;
        if !addr.ip().is_loopback() && !self.allow_non_loopback {
            return Err(ConfigError::Invalid(
                "non-loopback bind disallowed without allow_non_loopback".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be non-zero".to_string()));
        }
        if self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid("max_body_bytes exceeds limit".to_string()));
        }
        Ok(())
    }

    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address cannot be parsed.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }
}

/// Site content configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown on the home page.
    #[serde(default = "default_site_title")]
    pub title: String,
    /// Optional tagline shown under the title.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Links listed on the home page.
    #[serde(default)]
    pub links: Vec<SiteLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            tagline: None,
            links: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Validates site content settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when settings are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid("site.title must be non-empty".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ConfigError::Invalid("site.title exceeds length limit".to_string()));
        }
        if let Some(tagline) = &self.tagline
            && tagline.chars().count() > MAX_TAGLINE_LENGTH
        {
            return Err(ConfigError::Invalid("site.tagline exceeds length limit".to_string()));
        }
        if self.links.len() > MAX_SITE_LINKS {
            return Err(ConfigError::Invalid("site.links exceeds entry limit".to_string()));
        }
        for link in &self.links {
            link.validate()?;
        }
        Ok(())
    }
}

/// A single link listed on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    /// Link label shown to the user.
    pub label: String,
    /// Link target. Relative paths and http(s) URLs only.
    pub href: String,
}

impl SiteLink {
    /// Validates a link entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the entry is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::Invalid("link label must be non-empty".to_string()));
        }
        if self.label.chars().count() > MAX_LINK_LABEL_LENGTH {
            return Err(ConfigError::Invalid("link label exceeds length limit".to_string()));
        }
        if self.href.trim().is_empty() {
            return Err(ConfigError::Invalid("link href must be non-empty".to_string()));
        }
        if self.href.chars().count() > MAX_LINK_HREF_LENGTH {
            return Err(ConfigError::Invalid("link href exceeds length limit".to_string()));
        }
        let allowed = self.href.starts_with('/')
            || self.href.starts_with("http://")
            || self.href.starts_with("https://");
        if !allowed {
            return Err(ConfigError::Invalid(
                "link href must be a relative path or http(s) url".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request audit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Whether request audit logging is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log file path. Stderr is used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when settings are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid("audit.path must be non-empty".to_string()));
            }
            validate_path(Path::new(path))?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default site title.
fn default_site_title() -> String {
    DEFAULT_SITE_TITLE.to_string()
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the effective config path from argument, env var, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR) {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must be non-empty")));
        }
        return Ok(PathBuf::from(value));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates path shape against traversal and length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let total_length = path.as_os_str().len();
    if total_length > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds total length limit".to_string()));
    }
    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(ConfigError::Invalid(
                    "path must not contain parent directory components".to_string(),
                ));
            }
            Component::Normal(part) => {
                if part.len() > MAX_PATH_COMPONENT_LENGTH {
                    return Err(ConfigError::Invalid(
                        "path component exceeds length limit".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem read failures.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse failures.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation failures.
    #[error("invalid config: {0}")]
    Invalid(String),
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

    use std::path::Path;

    use super::MAX_SITE_LINKS;
    use super::PortalConfig;
    use super::ServerConfig;
    use super::SiteConfig;
    use super::SiteLink;
    use super::validate_path;

    #[test]
    fn default_config_is_valid() {
        let config = PortalConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let config = PortalConfig {
            site: SiteConfig {
                title: "   ".to_string(),
                ..SiteConfig::default()
            },
            ..PortalConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("site.title must be non-empty"));
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let config = PortalConfig {
            server: ServerConfig {
                bind: "not-an-address".to_string(),
                ..ServerConfig::default()
            },
            ..PortalConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("invalid bind address"));
    }

    #[test]
    fn non_loopback_bind_requires_opt_in() {
        let mut config = PortalConfig {
            server: ServerConfig {
                bind: "0.0.0.0:8080".to_string(),
                ..ServerConfig::default()
            },
            ..PortalConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("non-loopback bind disallowed"));
        config.server.allow_non_loopback = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let config = PortalConfig {
            server: ServerConfig {
                max_body_bytes: 0,
                ..ServerConfig::default()
            },
            ..PortalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn link_href_scheme_is_restricted() {
        let config = PortalConfig {
            site: SiteConfig {
                links: vec![SiteLink {
                    label: "bad".to_string(),
                    href: "javascript:alert(1)".to_string(),
                }],
                ..SiteConfig::default()
            },
            ..PortalConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("relative path or http(s) url"));
    }

    #[test]
    fn link_count_limit_is_enforced() {
        let config = PortalConfig {
            site: SiteConfig {
                links: (0..=MAX_SITE_LINKS)
                    .map(|index| SiteLink {
                        label: format!("link {index}"),
                        href: "/ok".to_string(),
                    })
                    .collect(),
                ..SiteConfig::default()
            },
            ..PortalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parent_dir_paths_are_rejected() {
        assert!(validate_path(Path::new("../portal.toml")).is_err());
        assert!(validate_path(Path::new("conf/portal.toml")).is_ok());
    }

    #[test]
    fn empty_audit_path_is_rejected() {
        let config = PortalConfig {
            audit: super::AuditConfig {
                enabled: true,
                path: Some("  ".to_string()),
            },
            ..PortalConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("audit.path must be non-empty"));
    }
}
