// src/models/mod.rs

//! Domain models for the search engine.

mod catalog;
mod config;
mod result;
mod site;

pub use catalog::{Catalog, CatalogIssue};
pub use config::{CatalogConfig, Config, LoggingConfig, SearchConfig, WafConfig};
pub use result::{ProbeResult, QueryStatus};
pub use site::{ErrorType, NamingRule, OneOrMany, RequestMethod, SiteProfile};
