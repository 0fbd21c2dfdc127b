// ABOUTME: Environment-only client configuration: backend URL, API prefix and HTTP timeouts
// ABOUTME: Validates and normalises values, and joins endpoint paths against the base URL
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Client configuration
//!
//! Configuration comes from environment variables only; there is no config
//! file. Every value has a default suitable for a local backend.

use std::env;
use std::time::Duration;

use booking_core::constants::{defaults, env_config};
use booking_core::{BookingError, BookingResult};
use url::Url;

/// Connection settings for the booking backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin; always ends with `/`
    pub base_url: Url,
    /// API path prefix relative to the base URL; always ends with `/`
    pub api_prefix: String,
    /// CSRF cookie endpoint relative to the base URL
    pub csrf_cookie_path: String,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Default settings for an already-parsed base URL, not yet validated
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            api_prefix: defaults::API_PREFIX.to_owned(),
            csrf_cookie_path: defaults::CSRF_COOKIE_PATH.to_owned(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_owned(),
        }
    }

    /// Default configuration pointed at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the URL is invalid
    pub fn new(base_url: &str) -> BookingResult<Self> {
        let mut config = Self::with_base_url(parse_url(base_url)?);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if a variable is present but invalid
    pub fn from_env() -> BookingResult<Self> {
        let base_url = env::var(env_config::API_URL).unwrap_or_else(|_| defaults::BASE_URL.into());
        let mut config = Self {
            api_prefix: env::var(env_config::API_PREFIX)
                .unwrap_or_else(|_| defaults::API_PREFIX.into()),
            csrf_cookie_path: env::var(env_config::CSRF_PATH)
                .unwrap_or_else(|_| defaults::CSRF_COOKIE_PATH.into()),
            request_timeout_secs: env_u64(
                env_config::HTTP_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            connect_timeout_secs: env_u64(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                defaults::CONNECT_TIMEOUT_SECS,
            )?,
            ..Self::with_base_url(parse_url(&base_url)?)
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate values and normalise paths
    ///
    /// The base URL and API prefix gain a trailing `/`; leading `/` is
    /// stripped from relative paths so they join under the base URL.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` for non-http(s) URLs or zero timeouts
    pub fn validate(&mut self) -> BookingResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(BookingError::config(
                env_config::API_URL,
                format!("unsupported scheme '{}'", self.base_url.scheme()),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(BookingError::config(env_config::API_URL, "not a base URL"));
        }
        if !self.base_url.path().ends_with('/') {
            let path = format!("{}/", self.base_url.path());
            self.base_url.set_path(&path);
        }

        self.api_prefix = normalise_dir(&self.api_prefix);
        self.csrf_cookie_path = self.csrf_cookie_path.trim_start_matches('/').to_owned();

        if self.request_timeout_secs == 0 {
            return Err(BookingError::config(
                env_config::HTTP_TIMEOUT_SECS,
                "must be greater than 0",
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(BookingError::config(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Absolute URL of an API endpoint
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the path cannot be joined
    pub fn endpoint(&self, path: &str) -> BookingResult<Url> {
        let relative = format!("{}{}", self.api_prefix, path.trim_start_matches('/'));
        self.base_url
            .join(&relative)
            .map_err(|e| BookingError::config(env_config::API_PREFIX, e))
    }

    /// Absolute URL of the CSRF cookie endpoint
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the path cannot be joined
    pub fn csrf_url(&self) -> BookingResult<Url> {
        self.base_url
            .join(&self.csrf_cookie_path)
            .map_err(|e| BookingError::config(env_config::CSRF_PATH, e))
    }

    /// Whole-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_url(raw: &str) -> BookingResult<Url> {
    Url::parse(raw.trim()).map_err(|e| BookingError::config(env_config::API_URL, e))
}

fn env_u64(key: &'static str, default: u64) -> BookingResult<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| BookingError::config(key, format!("'{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

fn normalise_dir(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}
