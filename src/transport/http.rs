// src/transport/http.rs

//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::Result;
use crate::models::{RequestMethod, SearchConfig};
use crate::transport::{ProbeRequest, ProbeResponse, Transport, TransportError};
use crate::utils::http::create_async_client;

/// HTTP transport shared by every probe.
///
/// Redirect policy is fixed per client, so one client of each kind is built up front.
#[derive(Clone)]
pub struct HttpTransport {
    following: Client,
    direct: Client,
}

impl HttpTransport {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            following: create_async_client(config, true)?,
            direct: create_async_client(config, false)?,
        })
    }

    fn client(&self, follow_redirects: bool) -> &Client {
        if follow_redirects {
            &self.following
        } else {
            &self.direct
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ProbeRequest) -> std::result::Result<ProbeResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self
            .client(request.follow_redirects)
            .request(to_method(request.method), url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.method.carries_body() {
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }
        }

        let response = builder.send().await.map_err(classify_error)?;
        let status = response.status().as_u16();
        let body = if request.method == RequestMethod::Head {
            String::new()
        } else {
            response.text().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Body(e.to_string())
                }
            })?
        };

        Ok(ProbeResponse { status, body })
    }
}

fn to_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Head => Method::HEAD,
        RequestMethod::Post => Method::POST,
        RequestMethod::Put => Method::PUT,
    }
}

fn classify_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_method(RequestMethod::Get), Method::GET);
        assert_eq!(to_method(RequestMethod::Head), Method::HEAD);
        assert_eq!(to_method(RequestMethod::Post), Method::POST);
        assert_eq!(to_method(RequestMethod::Put), Method::PUT);
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let transport = HttpTransport::new(&SearchConfig::default()).unwrap();
        let request = ProbeRequest {
            method: RequestMethod::Get,
            url: "not a url".into(),
            headers: Default::default(),
            body: None,
            follow_redirects: true,
        };
        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
