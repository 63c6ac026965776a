// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::{Catalog, Config};
use crate::utils::log;

/// Validate configuration and the site catalog.
///
/// Hard failures (bad config, unloadable catalog) are errors; entries that
/// load but cannot be probed reliably are reported as warnings.
pub fn run_validate(config: &Config, catalog_path: &Path) -> Result<usize> {
    log::header("Validating configuration");

    if let Err(e) = config.validate() {
        log::error(&format!("Config validation failed: {e}"));
        return Err(e);
    }
    log::info("Config OK");
    log::sub_item(&format!("User-Agent: {}", config.search.user_agent));
    log::sub_item(&format!("Timeout: {}s", config.search.timeout_secs));
    log::sub_item(&format!("Max workers: {}", config.search.max_workers));
    log::sub_item(&format!("WAF fingerprints: {}", config.waf.fingerprints.len()));

    let catalog = match Catalog::load(catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error(&format!("Catalog validation failed: {e}"));
            return Err(e);
        }
    };
    log::info(&format!(
        "Catalog OK: {} sites from {}",
        catalog.len(),
        catalog_path.display()
    ));

    let issues = catalog.validate();
    for issue in &issues {
        log::warn(&issue.to_string());
    }
    log::summary(
        "Validation",
        &[
            ("Sites", catalog.len().to_string()),
            ("Warnings", issues.len().to_string()),
        ],
    );

    Ok(issues.len())
}
