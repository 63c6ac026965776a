// src/services/probe.rs

//! Probe worker: one site, one username, one result.

use std::sync::Arc;

use crate::models::{ProbeResult, QueryStatus, SiteProfile};
use crate::services::classifier::ResponseClassifier;
use crate::services::request::{Rejection, RequestBuilder};
use crate::transport::Transport;

/// Runs a single probe end to end. Never fails: every failure is encoded in
/// the returned status, and `None` means the site contributes nothing.
pub struct ProbeWorker {
    builder: RequestBuilder,
    classifier: ResponseClassifier,
    transport: Arc<dyn Transport>,
}

impl ProbeWorker {
    pub fn new(
        builder: RequestBuilder,
        classifier: ResponseClassifier,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            builder,
            classifier,
            transport,
        }
    }

    pub async fn probe(&self, username: &str, profile: &SiteProfile) -> Option<ProbeResult> {
        let site_name = profile.name.as_str();
        let main_url = profile.main_url();

        let resolved = match self.builder.build(username, profile) {
            Ok(resolved) => resolved,
            Err(Rejection::Illegal) => {
                log::debug!("{site_name}: '{username}' violates the naming rule");
                return Some(ProbeResult::unresolved(
                    site_name,
                    main_url,
                    QueryStatus::Illegal,
                ));
            }
            Err(Rejection::UnusableRule { pattern }) => {
                log::debug!("{site_name}: naming rule '{pattern}' is unusable");
                return Some(ProbeResult::unresolved(
                    site_name,
                    main_url,
                    QueryStatus::Unknown,
                ));
            }
        };

        let result = |status: QueryStatus, http_status_code: String| ProbeResult {
            site_name: site_name.to_string(),
            main_url: main_url.to_string(),
            profile_url: resolved.profile_url.clone(),
            status,
            http_status_code,
        };

        match self.transport.send(&resolved.request).await {
            Ok(response) => {
                match self
                    .classifier
                    .classify(profile, &response.body, response.status)
                {
                    Some(status) => {
                        log::debug!("{site_name}: {status} (HTTP {})", response.status);
                        Some(result(status, response.status.to_string()))
                    }
                    None => {
                        log::debug!("{site_name}: no verdict (HTTP {})", response.status);
                        None
                    }
                }
            }
            Err(e) => {
                log::warn!("{site_name}: probe of {} failed: {e}", resolved.request.url);
                Some(result(QueryStatus::Unknown, String::new()))
            }
        }
    }
}
