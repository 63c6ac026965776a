// src/pipeline/sites.rs

use crate::models::Catalog;
use crate::utils::log;

/// List catalog entries with how each one is probed.
pub fn run_sites(catalog: &Catalog) {
    log::header(&format!("{} sites", catalog.len()));

    for site in catalog.iter() {
        log::result(&format!(
            "{:<28} {:<13} {:<5} {}",
            site.name,
            site.error_type.to_string(),
            site.request_method.to_string(),
            site.main_url()
        ));
    }
}
