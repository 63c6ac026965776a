// src/services/classifier.rs

//! Response classifier.
//!
//! Applies the site's declared strategy to a response. A challenge page from
//! an edge-security vendor poisons the evidence for every strategy, so it is
//! checked first and yields no verdict.

use std::collections::HashSet;

use crate::models::{ErrorType, QueryStatus, SiteProfile};

/// Classifies responses into a [`QueryStatus`], or `None` when there is no verdict.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    fingerprints: Vec<String>,
}

impl ResponseClassifier {
    /// Create a classifier with the given challenge-page markers.
    pub fn new(fingerprints: Vec<String>) -> Self {
        Self { fingerprints }
    }

    /// Whether the body is a bot-challenge page rather than the site's answer.
    pub fn is_challenge_page(&self, body: &str) -> bool {
        self.fingerprints
            .iter()
            .any(|marker| body.contains(marker.as_str()))
    }

    pub fn classify(&self, profile: &SiteProfile, body: &str, status: u16) -> Option<QueryStatus> {
        if self.is_challenge_page(body) {
            return None;
        }

        let success = (200..300).contains(&status);

        match profile.error_type {
            ErrorType::Message => {
                let messages = profile.error_msg.as_ref()?;
                if messages.iter().any(|msg| body.contains(msg.as_str())) {
                    Some(QueryStatus::Available)
                } else {
                    Some(QueryStatus::Claimed)
                }
            }
            ErrorType::StatusCode => {
                let error_codes: HashSet<u16> = profile
                    .error_code
                    .iter()
                    .flat_map(|codes| codes.iter().copied())
                    .collect();
                if error_codes.contains(&status) || !success {
                    None
                } else {
                    Some(QueryStatus::Claimed)
                }
            }
            // Redirects are not followed for this strategy, so 2xx means the
            // profile exists at that exact path.
            ErrorType::ResponseUrl => success.then_some(QueryStatus::Claimed),
            ErrorType::Unknown => None,
        }
    }
}
