//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and probing behavior settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Where the site catalog lives
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Challenge-page detection
    #[serde(default)]
    pub waf: WafConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A relative catalog path is resolved against the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        if let Some(dir) = path.parent() {
            config.catalog.path = config.catalog.resolve(dir);
        }
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.user_agent.trim().is_empty() {
            return Err(AppError::validation("search.user_agent is empty"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.search.max_workers == 0 {
            return Err(AppError::validation("search.max_workers must be > 0"));
        }
        if self.waf.fingerprints.iter().any(|f| f.is_empty()) {
            return Err(AppError::validation(
                "waf.fingerprints must not contain empty markers",
            ));
        }
        Ok(())
    }
}

/// HTTP client and probing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// User-Agent header sent with every probe
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Absolute per-probe timeout in seconds (connect + full response)
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Upper bound on concurrently running probes
    #[serde(default = "defaults::max_workers")]
    pub max_workers: usize,
}

impl SearchConfig {
    /// Pool size for a catalog of the given size.
    pub fn pool_size(&self, catalog_len: usize) -> usize {
        self.max_workers.min(catalog_len).max(1)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_workers: defaults::max_workers(),
        }
    }
}

/// Site catalog location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "defaults::catalog_path")]
    pub path: PathBuf,
}

impl CatalogConfig {
    fn resolve(&self, base: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base.join(&self.path)
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: defaults::catalog_path(),
        }
    }
}

/// Known bot-challenge page markers.
///
/// These are snapshots of third-party markup and drift as vendors change
/// their pages, so they are data rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WafConfig {
    #[serde(default = "defaults::waf_fingerprints")]
    pub fingerprints: Vec<String>,
}

impl Default for WafConfig {
    fn default() -> Self {
        Self {
            fingerprints: defaults::waf_fingerprints(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Search defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64; rv:129.0) Gecko/20100101 Firefox/129.0".into()
    }
    pub fn timeout() -> u64 {
        60
    }
    pub fn max_workers() -> usize {
        20
    }

    pub fn catalog_path() -> PathBuf {
        PathBuf::from("sites.json")
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn waf_fingerprints() -> Vec<String> {
        vec![
            // 2024-05-13 Cloudflare
            ".loading-spinner{visibility:hidden}body.no-js .challenge-running{display:none}body.dark{background-color:#222;color:#d9d9d9}body.dark a{color:#fff}body.dark a:hover{color:#ee730a;text-decoration:underline}body.dark .lds-ring div{border-color:#999 transparent transparent}body.dark .font-red{color:#b20f03}body.dark".into(),
            // 2024-11-11 Cloudflare error page
            "<span id=\"challenge-error-text\">".into(),
            // 2024-11-11 Cloudfront (AWS)
            "AwsWafIntegration.forceRefreshToken".into(),
            // 2024-04-09 PerimeterX / Human Security
            "{return l.onPageView}}),Object.defineProperty(r,\"perimeterxIdentifiers\",{enumerable:".into(),
        ]
    }
}
