// src/models/catalog.rs

//! The site catalog: every probe definition, loaded once and shared read-only.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{ErrorType, NamingRule, SiteProfile};
use crate::utils::template::PLACEHOLDER;

/// Immutable set of site probe definitions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sites: Vec<SiteProfile>,
}

impl Catalog {
    /// Load the catalog from a JSON object keyed by site name.
    ///
    /// Keys starting with `$` (such as `$schema`) are metadata and skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AppError::catalog(path, e))?;
        let catalog = Self::from_json(&content).map_err(|e| match e {
            AppError::Json(e) => AppError::catalog(path, e),
            other => other,
        })?;

        if catalog.is_empty() {
            return Err(AppError::catalog(path, "no site definitions found"));
        }
        log::debug!("Loaded {} site definitions from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Parse catalog JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Map<String, Value> = serde_json::from_str(content)?;

        let mut sites = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            if name.starts_with('$') {
                continue;
            }
            let mut profile: SiteProfile =
                serde_json::from_value(value).map_err(|e| AppError::site(&name, e))?;
            profile.name = name;

            if let Some(NamingRule::Unsupported { pattern, reason }) = &profile.regex_check {
                log::warn!(
                    "Naming rule for {} cannot be compiled ({}): {}. Probes will report UNKNOWN.",
                    profile.name,
                    pattern,
                    reason
                );
            }
            sites.push(profile);
        }

        Ok(Self { sites })
    }

    /// Build a catalog from already constructed profiles.
    pub fn from_profiles(sites: Vec<SiteProfile>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteProfile> {
        self.sites.iter()
    }

    pub fn sites(&self) -> &[SiteProfile] {
        &self.sites
    }

    /// Look up a site by name.
    pub fn get(&self, name: &str) -> Option<&SiteProfile> {
        self.sites.iter().find(|site| site.name == name)
    }

    /// Report entries that will load but cannot be probed reliably.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for site in &self.sites {
            let mut issue = |message: String| {
                issues.push(CatalogIssue {
                    site: site.name.clone(),
                    message,
                })
            };

            if url::Url::parse(site.main_url()).is_err() {
                issue(format!("urlMain '{}' is not a valid URL", site.url_main));
            }
            if !site.url.contains(PLACEHOLDER) {
                issue(format!("url '{}' has no {PLACEHOLDER} placeholder", site.url));
            }
            if let Some(NamingRule::Unsupported { pattern, reason }) = &site.regex_check {
                issue(format!("regexCheck '{pattern}' does not compile: {reason}"));
            }
            match site.error_type {
                ErrorType::Message if site.error_msg.is_none() => {
                    issue("errorType 'message' without errorMsg".to_string())
                }
                ErrorType::Unknown => issue("unrecognised errorType".to_string()),
                _ => {}
            }
            if site.request_payload.is_some() && !site.request_method.carries_body() {
                issue(format!(
                    "request_payload is ignored for {} requests",
                    site.request_method
                ));
            }
        }

        issues
    }
}

/// A problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub site: String,
    pub message: String,
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.site, self.message)
    }
}
