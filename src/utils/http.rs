// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::error::Result;
use crate::models::SearchConfig;

/// Create a configured asynchronous HTTP client.
///
/// The timeout bounds the whole exchange, connection through body.
pub fn create_async_client(config: &SearchConfig, follow_redirects: bool) -> Result<reqwest::Client> {
    let redirect = if follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(redirect)
        .build()?;
    Ok(client)
}
