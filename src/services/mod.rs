//! Service layer for the search engine.
//!
//! - Request building (`RequestBuilder`)
//! - Response classification (`ResponseClassifier`)
//! - Single-site probing (`ProbeWorker`)
//! - Bounded concurrency (`WorkerPool`)
//! - Catalog-wide search (`SearchService`)

mod classifier;
mod pool;
mod probe;
mod request;
mod search;

pub use classifier::ResponseClassifier;
pub use pool::WorkerPool;
pub use probe::ProbeWorker;
pub use request::{Rejection, RequestBuilder, ResolvedProbe};
pub use search::{SearchOutcome, SearchService};
