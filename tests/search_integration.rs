//! Integration tests for the search engine over real HTTP.
//!
//! A local wiremock server stands in for the catalog's sites; requests go
//! through the reqwest transport exactly as in production.

use std::sync::Arc;
use std::time::Duration;

use namecheck::error::AppError;
use namecheck::models::{Catalog, Config, QueryStatus};
use namecheck::services::{SearchService, WorkerPool};
use namecheck::transport::{HttpTransport, ProbeRequest, Transport, TransportError};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a config with a short timeout
fn test_config(timeout_secs: u64) -> Config {
    let mut config = Config::default();
    config.search.timeout_secs = timeout_secs;
    config.search.user_agent = "namecheck-test/1.0".to_string();
    config
}

fn catalog_for(server: &MockServer, json_template: &str) -> Arc<Catalog> {
    let json = json_template.replace("BASE", &server.uri());
    Arc::new(Catalog::from_json(&json).expect("catalog should parse"))
}

#[tokio::test]
async fn test_message_strategy_claimed_and_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome bob"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/eve"))
        .respond_with(ResponseTemplate::new(200).set_body_string("user not found"))
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteA": {"urlMain": "BASE/", "url": "BASE/a/{}", "errorType": "message", "errorMsg": "not found"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let outcome = service.probe_all("bob").await.unwrap();
    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert_eq!(result.status, QueryStatus::Claimed);
    assert_eq!(result.http_status_code, "200");
    assert_eq!(result.profile_url, format!("{}/a/bob", server.uri()));

    let outcome = service.probe_all("eve").await.unwrap();
    assert_eq!(outcome.results[0].status, QueryStatus::Available);
    assert!(service.search_by_username("eve").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_code_strategy() {
    let server = MockServer::start().await;
    Mock::given(path("/b/bob"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/b/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteB": {"urlMain": "BASE/", "url": "BASE/b/{}", "errorType": "status_code", "errorCode": 404}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let claimed = service.search_by_username("bob").await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].site_name, "SiteB");

    let outcome = service.probe_all("ghost").await.unwrap();
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.dropped, 1);
}

#[tokio::test]
async fn test_response_url_does_not_follow_redirects() {
    let server = MockServer::start().await;
    Mock::given(path("/c/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_string("profile"))
        .mount(&server)
        .await;
    Mock::given(path("/c/ghost"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
        .mount(&server)
        .await;
    Mock::given(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("home"))
        .expect(0)
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteC": {"urlMain": "BASE/", "url": "BASE/c/{}", "errorType": "response_url"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    assert_eq!(service.search_by_username("bob").await.unwrap().len(), 1);

    let outcome = service.probe_all("ghost").await.unwrap();
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.dropped, 1);
}

#[tokio::test]
async fn test_status_code_strategy_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(path("/d/bob"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/d/profile/bob"))
        .mount(&server)
        .await;
    Mock::given(path("/d/profile/bob"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteD": {"urlMain": "BASE/", "url": "BASE/d/{}", "errorType": "status_code"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let claimed = service.search_by_username("bob").await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].profile_url, format!("{}/d/bob", server.uri()));
}

#[tokio::test]
async fn test_timeout_is_unknown_and_batch_completes() {
    let server = MockServer::start().await;
    Mock::given(path("/slow/bob"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
        .mount(&server)
        .await;
    Mock::given(path("/fast/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hi bob"))
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{
            "SiteC": {"urlMain": "BASE/", "url": "BASE/slow/{}", "errorType": "message", "errorMsg": "not found"},
            "SiteA": {"urlMain": "BASE/", "url": "BASE/fast/{}", "errorType": "message", "errorMsg": "not found"}
        }"#,
    );
    let service = SearchService::from_config(&test_config(1), catalog).unwrap();

    let outcome = service.probe_all("bob").await.unwrap();
    let slow = outcome
        .results
        .iter()
        .find(|r| r.site_name == "SiteC")
        .expect("timed out site still reported");
    assert_eq!(slow.status, QueryStatus::Unknown);
    assert_eq!(slow.http_status_code, "");

    let claimed = outcome.into_claimed();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].site_name, "SiteA");
}

#[tokio::test]
async fn test_challenge_page_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(path("/w/bob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><span id="challenge-error-text">Verify you are human</span></html>"#),
        )
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteW": {"urlMain": "BASE/", "url": "BASE/w/{}", "errorType": "message", "errorMsg": "not found"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let outcome = service.probe_all("bob").await.unwrap();
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.dropped, 1);
}

#[tokio::test]
async fn test_post_probe_sends_payload_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/check"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "namecheck-test/1.0"))
        .and(body_string(r#"{"login":"john doe"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"user":{"id":1}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteP": {
            "urlMain": "BASE/",
            "url": "BASE/u/{}",
            "urlProbe": "BASE/api/check",
            "request_method": "POST",
            "request_payload": {"login": "{}"},
            "headers": {"Content-Type": "application/json"},
            "errorType": "message",
            "errorMsg": "\"user\":null"
        }}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let claimed = service.search_by_username("john doe").await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].profile_url, format!("{}/u/john%20doe", server.uri()));
}

#[tokio::test]
async fn test_naming_rule_rejects_without_network() {
    let server = MockServer::start().await;
    Mock::given(path("/r/Bad%20Name"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let catalog = catalog_for(
        &server,
        r#"{"SiteR": {"urlMain": "BASE/", "url": "BASE/r/{}", "regexCheck": "[a-z]+", "errorType": "status_code"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    let outcome = service.probe_all("Bad Name").await.unwrap();
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].status, QueryStatus::Illegal);
    assert_eq!(outcome.results[0].profile_url, "");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_head_request_has_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/h/bob"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&test_config(5).search).unwrap();
    let request = ProbeRequest {
        method: namecheck::models::RequestMethod::Head,
        url: format!("{}/h/bob", server.uri()),
        headers: Default::default(),
        body: None,
        follow_redirects: true,
    };
    let response = transport.send(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let transport = HttpTransport::new(&test_config(2).search).unwrap();
    let request = ProbeRequest {
        method: namecheck::models::RequestMethod::Get,
        url: format!("http://127.0.0.1:{port}/gone"),
        headers: Default::default(),
        body: None,
        follow_redirects: true,
    };
    let err = transport.send(&request).await.unwrap_err();
    assert!(matches!(
        err,
        TransportError::Connect(_) | TransportError::Request(_) | TransportError::Timeout
    ));
}

#[tokio::test]
async fn test_many_sites_share_a_small_pool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("hello")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let entries: Vec<String> = (0..12)
        .map(|i| {
            format!(
                r#""S{i}": {{"urlMain": "BASE/", "url": "BASE/s{i}/{{}}", "errorType": "status_code"}}"#
            )
        })
        .collect();
    let catalog = catalog_for(&server, &format!("{{{}}}", entries.join(",")));

    let config = test_config(5);
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.search).unwrap());
    let service = SearchService::with_transport(&config, catalog, transport, WorkerPool::new(3));

    let claimed = service.search_by_username("bob").await.unwrap();
    assert_eq!(claimed.len(), 12);
    assert_eq!(server.received_requests().await.unwrap().len(), 12);
}

#[tokio::test]
async fn test_shutdown_stops_future_searches() {
    let server = MockServer::start().await;
    let catalog = catalog_for(
        &server,
        r#"{"SiteA": {"urlMain": "BASE/", "url": "BASE/a/{}", "errorType": "status_code"}}"#,
    );
    let service = SearchService::from_config(&test_config(5), catalog).unwrap();

    service.shutdown();
    assert!(matches!(
        service.search_by_username("bob").await,
        Err(AppError::PoolClosed)
    ));
}
