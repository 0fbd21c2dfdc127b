// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, a mock backend and pre-wired clients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `booking_client`
//!
//! Every test talks to a `wiremock` server standing in for the booking
//! backend; nothing leaves the machine.

use std::env;
use std::sync::Once;
use std::time::Duration;

use anyhow::Result;
use booking_client::client::AuthenticatedClient;
use booking_client::config::ClientConfig;
use booking_core::constants::security::{XSRF_COOKIE, XSRF_HEADER};
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

/// Anti-forgery cookie endpoint on the mock server
pub const CSRF_PATH: &str = "/sanctum/csrf-cookie";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Full path of an API endpoint on the mock server
pub fn api(endpoint: &str) -> String {
    format!("/api/v1/{}", endpoint.trim_start_matches('/'))
}

/// Response that sets the anti-forgery cookie to `token`
pub fn xsrf_cookie(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(204).insert_header(
        "set-cookie",
        format!("{XSRF_COOKIE}={token}; Path=/; SameSite=Lax").as_str(),
    )
}

/// JSON response with `status`
pub fn json(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

/// Mock server, nothing mounted yet
pub async fn start_backend() -> MockServer {
    init_test_logging();
    MockServer::start().await
}

/// Client for `server` with an empty cookie jar
pub fn client_for(server: &MockServer) -> Result<AuthenticatedClient> {
    let mut config = ClientConfig::new(&server.uri())?;
    config.request_timeout_secs = 5;
    config.connect_timeout_secs = 2;
    Ok(AuthenticatedClient::new(config)?)
}

/// Mount the cookie endpoint handing out `token`; expects `times` calls
pub async fn mount_csrf(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(CSRF_PATH))
        .respond_with(xsrf_cookie(token))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount the cookie endpoint handing out `token` after `delay`
pub async fn mount_slow_csrf(server: &MockServer, token: &str, delay: Duration, times: u64) {
    Mock::given(method("GET"))
        .and(path(CSRF_PATH))
        .respond_with(xsrf_cookie(token).set_delay(delay))
        .expect(times)
        .mount(server)
        .await;
}

/// Client whose session was initialised against `server` with `token`
pub async fn initialised_client(server: &MockServer, token: &str) -> Result<AuthenticatedClient> {
    mount_csrf(server, token, 1).await;
    let client = client_for(server)?;
    client.initialize().await?;
    Ok(client)
}

/// Mount `endpoint` so it answers `stale_status` to the stale token and
/// `body` to the fresh one
pub async fn mount_token_gated(
    server: &MockServer,
    http_method: &str,
    endpoint: &str,
    stale: &str,
    stale_status: u16,
    fresh: &str,
    body: Value,
) {
    Mock::given(method(http_method))
        .and(path(api(endpoint)))
        .and(header(XSRF_HEADER, stale))
        .respond_with(json(stale_status, serde_json::json!({"message": "CSRF token mismatch."})))
        .mount(server)
        .await;
    Mock::given(method(http_method))
        .and(path(api(endpoint)))
        .and(header(XSRF_HEADER, fresh))
        .respond_with(json(200, body))
        .mount(server)
        .await;
}

/// Requests the server received for `full_path`
pub async fn hits(server: &MockServer, full_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == full_path)
        .count()
}
