// src/pipeline/search.rs

//! Username search pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Catalog, Config, ProbeResult, QueryStatus};
use crate::services::SearchService;
use crate::utils::log;

/// Output switches for [`run_search`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Print JSON instead of text
    pub json: bool,
    /// Report every status, not only claimed sites
    pub all: bool,
}

/// Search each username in turn over one shared service.
pub async fn run_search(
    config: &Config,
    catalog: Arc<Catalog>,
    usernames: &[String],
    options: SearchOptions,
) -> Result<BTreeMap<String, Vec<ProbeResult>>> {
    let service = SearchService::from_config(config, catalog)?;
    let mut report = BTreeMap::new();

    for username in usernames {
        log::header(&format!("Searching for '{username}'"));

        let outcome = service.probe_all(username).await?;
        let summary = [
            ("Sites probed", service.catalog().len().to_string()),
            ("Claimed", outcome.count(QueryStatus::Claimed).to_string()),
            ("Elapsed", format!("{:.1}s", outcome.elapsed_secs())),
        ];

        let results = if options.all {
            outcome.results
        } else {
            outcome.into_claimed()
        };

        if !options.json {
            for result in &results {
                log::result(&result.to_string());
            }
        }
        log::summary(username, &summary);
        report.insert(username.clone(), results);
    }

    service.shutdown();

    if options.json {
        log::result(&serde_json::to_string_pretty(&report)?);
    }
    Ok(report)
}
