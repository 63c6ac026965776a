// src/services/request.rs

//! Request builder.
//!
//! Turns a username and a site profile into a concrete request. Pure: no I/O.

use std::collections::BTreeMap;

use crate::models::{ErrorType, SiteProfile};
use crate::transport::ProbeRequest;
use crate::utils::template::{interpolate, interpolate_url};

/// Why a site was not probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Username violates the site's naming rule
    Illegal,
    /// The site's naming rule could not be compiled
    UnusableRule { pattern: String },
}

/// A request ready to send, plus the profile URL shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProbe {
    pub profile_url: String,
    pub request: ProbeRequest,
}

/// Builds probe requests, stamping each with the identifying User-Agent.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    user_agent: String,
}

impl RequestBuilder {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    pub fn build(&self, username: &str, profile: &SiteProfile) -> Result<ResolvedProbe, Rejection> {
        if let Some(rule) = &profile.regex_check {
            match rule.matches(username) {
                Some(true) => {}
                Some(false) => return Err(Rejection::Illegal),
                None => {
                    return Err(Rejection::UnusableRule {
                        pattern: rule.pattern().to_string(),
                    });
                }
            }
        }

        let profile_url = interpolate_url(&profile.url, username);
        let probe_url = match &profile.url_probe {
            Some(template) => interpolate_url(template, username),
            None => profile_url.clone(),
        };

        let body = profile
            .request_payload
            .as_deref()
            .filter(|_| profile.request_method.carries_body())
            .map(|template| interpolate(template, username));

        // Names are case-insensitive; lowercase so profile headers replace defaults
        let mut headers = BTreeMap::new();
        headers.insert("user-agent".to_string(), self.user_agent.clone());
        headers.extend(
            profile
                .headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );

        Ok(ResolvedProbe {
            profile_url,
            request: ProbeRequest {
                method: profile.request_method,
                url: probe_url,
                headers,
                body,
                // response_url must see the first hop, not the end of a redirect chain
                follow_redirects: profile.error_type != ErrorType::ResponseUrl,
            },
        })
    }
}
