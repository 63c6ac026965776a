//! Pipeline entry points for CLI operations.
//!
//! - `run_search`: Probe the catalog for one or more usernames
//! - `run_validate`: Check configuration and catalog
//! - `run_sites`: List the catalog

pub mod search;
pub mod sites;
pub mod validate;

pub use search::{SearchOptions, run_search};
pub use sites::run_sites;
pub use validate::run_validate;
