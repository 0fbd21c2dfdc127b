// ABOUTME: HTTP client that attaches the anti-forgery token and recovers from token expiry
// ABOUTME: Refreshes the token once per expiry (single-flight) and replays the request once
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Authenticated client
//!
//! Every request carries the current `X-XSRF-TOKEN` read from the cookie
//! jar. A `419` or `403` answer means the token went stale: the client joins
//! (or starts) the single shared refresh, then replays the request exactly
//! once with whatever token the refresh installed. The replay's outcome is
//! returned as-is. If the refresh fails, the original rejection is returned.
//!
//! A refresh generation counter lets a request that was sent with an old
//! token, but rejected only after a refresh already finished, replay without
//! triggering a second refresh.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use booking_core::constants::security::{
    CSRF_REFRESH_KEY, FORBIDDEN_STATUS, TOKEN_EXPIRED_STATUS, XSRF_HEADER,
};
use booking_core::{BookingError, BookingResult};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::cookie_jar::SessionCookieJar;
use super::single_flight::SingleFlight;
use crate::config::ClientConfig;

/// Whether a status means the anti-forgery token was rejected
#[must_use]
pub const fn is_token_rejection(status: u16) -> bool {
    status == TOKEN_EXPIRED_STATUS || status == FORBIDDEN_STATUS
}

/// A request description that can be dispatched more than once
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Request with an explicit method
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET` request
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Decode` if the body cannot be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> BookingResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| BookingError::decode("request body", e))?;
        self.body = Some(value);
        Ok(self)
    }

    /// HTTP method
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint path relative to the API prefix
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A response of any status, with its body fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: Bytes,
}

impl ApiResponse {
    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Raw body
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Decode` if the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self, context: &'static str) -> BookingResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| BookingError::decode(context, e))
    }

    /// Server explanation from a `{message}` or `{error}` body
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let value: Value = serde_json::from_slice(&self.body).ok()?;
        ["message", "error"]
            .into_iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .filter(|message| !message.is_empty())
            .map(str::to_owned)
    }

    /// Error for a non-success response
    #[must_use]
    pub fn error(&self, fallback: &str) -> BookingError {
        let message = self
            .server_message()
            .unwrap_or_else(|| fallback.to_owned());
        BookingError::from_status(self.status, message)
    }

    /// `Ok(self)` for 2xx, the mapped error otherwise
    ///
    /// # Errors
    ///
    /// Returns the error from [`Self::error`] for non-2xx statuses
    pub fn success_or(self, fallback: &str) -> BookingResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.error(fallback))
        }
    }
}

struct ClientInner {
    http: Client,
    config: ClientConfig,
    jar: Arc<SessionCookieJar>,
    refresh: SingleFlight<&'static str, BookingResult<()>>,
    generation: AtomicU64,
}

impl ClientInner {
    async fn fetch_csrf_cookie(&self) -> BookingResult<()> {
        let url = self.config.csrf_url()?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(BookingError::network)?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(BookingError::from_status(
                status,
                "anti-forgery cookie request failed",
            ));
        }
        if self.jar.xsrf_token().is_none() {
            return Err(BookingError::Server {
                status,
                message: "no anti-forgery cookie issued".to_owned(),
            });
        }
        Ok(())
    }

    /// Refresh and bump the generation; skipped if `seen` is already outdated
    async fn refresh(self: Arc<Self>, seen: Option<u64>) -> BookingResult<()> {
        if let Some(seen) = seen {
            if self.generation.load(Ordering::Acquire) != seen {
                debug!("anti-forgery token already refreshed; skipping");
                return Ok(());
            }
        }
        info!("refreshing anti-forgery token");
        let result = self.fetch_csrf_cookie().await;
        match &result {
            Ok(()) => {
                self.generation.fetch_add(1, Ordering::AcqRel);
                info!("anti-forgery token refreshed");
            }
            Err(error) => warn!(%error, "anti-forgery token refresh failed"),
        }
        result
    }
}

/// HTTP client for the booking backend
///
/// Cheap to clone; clones share the cookie jar and the refresh guard.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("cookies", &self.inner.jar.len())
            .finish_non_exhaustive()
    }
}

impl AuthenticatedClient {
    /// Build a client for `config` with an empty cookie jar
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> BookingResult<Self> {
        let jar = Arc::new(SessionCookieJar::new(config.base_url.clone()));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let http = ClientBuilder::new()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| BookingError::config("http_client", e))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                jar,
                refresh: SingleFlight::new(),
                generation: AtomicU64::new(0),
            }),
        })
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Cookie jar shared by every request
    #[must_use]
    pub fn cookie_jar(&self) -> &SessionCookieJar {
        &self.inner.jar
    }

    /// Number of completed token refreshes
    #[must_use]
    pub fn refresh_generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Fetch the anti-forgery cookie at session start
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie endpoint fails or sets no token
    pub async fn initialize(&self) -> BookingResult<()> {
        let inner = Arc::clone(&self.inner);
        self.inner
            .refresh
            .run(CSRF_REFRESH_KEY, move || inner.refresh(None))
            .await
    }

    /// Drop every cookie, ending the local session
    pub fn clear_session(&self) {
        self.inner.jar.clear();
    }

    /// Send a request, recovering once from a stale anti-forgery token
    ///
    /// Any HTTP status is an `Ok` response; only transport failures are
    /// errors. A rejected replay is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Network` on transport failure, or
    /// `BookingError::Config` if the endpoint URL cannot be built
    pub async fn send(&self, request: &ApiRequest) -> BookingResult<ApiResponse> {
        let seen = self.inner.generation.load(Ordering::Acquire);
        let first = self.dispatch(request).await?;
        if !is_token_rejection(first.status) {
            return Ok(first);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            status = first.status,
            "anti-forgery token rejected"
        );
        let inner = Arc::clone(&self.inner);
        let refreshed = self
            .inner
            .refresh
            .run(CSRF_REFRESH_KEY, move || inner.refresh(Some(seen)))
            .await;

        match refreshed {
            Ok(()) => {
                debug!(method = %request.method, path = %request.path, "replaying request");
                self.dispatch(request).await
            }
            Err(_) => Ok(first),
        }
    }

    /// Send a request and decode a 2xx JSON body
    ///
    /// `context` names the operation in decode errors and is the fallback
    /// message when the server does not explain a failure.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error for non-2xx answers, or a decode,
    /// network or config error
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        context: &'static str,
    ) -> BookingResult<T> {
        self.send(request).await?.success_or(context)?.json(context)
    }

    async fn dispatch(&self, request: &ApiRequest) -> BookingResult<ApiResponse> {
        let url = self.inner.config.endpoint(&request.path)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.inner.jar.xsrf_token() {
            builder = builder.header(XSRF_HEADER, token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(BookingError::network)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(BookingError::network)?;
        Ok(ApiResponse { status, body })
    }
}
