// ABOUTME: Session lifecycle operations: login, registration, staff login and logout
// ABOUTME: Credentials are redacted from Debug output and never logged
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

use booking_core::constants::{endpoints, messages};
use booking_core::{BookingError, BookingResult};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::client::{ApiRequest, AuthenticatedClient};

/// Email and password
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Credentials from parts
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Patient registration form
#[derive(Clone, Serialize)]
pub struct Registration {
    /// First name
    pub name: String,
    /// Middle name, may be empty
    pub middle_name: String,
    /// Last name
    pub last_name: String,
    /// Account email
    pub email: String,
    /// Chosen password
    pub password: String,
    /// Password typed again
    pub password_confirmation: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Account endpoints of the API
#[derive(Debug, Clone)]
pub struct AccountService {
    client: AuthenticatedClient,
}

impl AccountService {
    /// Service sharing `client`'s session
    #[must_use]
    pub const fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Patient login
    ///
    /// # Errors
    ///
    /// Returns the mapped request error, with the server's message when given
    pub async fn login(&self, credentials: &Credentials) -> BookingResult<Value> {
        let response = self
            .post(endpoints::LOGIN, credentials, messages::LOGIN_FAILED)
            .await?;
        info!(email = %credentials.email, "logged in");
        Ok(response)
    }

    /// Staff (dentist or admin) login
    ///
    /// # Errors
    ///
    /// Returns the mapped request error, with the server's message when given
    pub async fn staff_login(&self, credentials: &Credentials) -> BookingResult<Value> {
        let response = self
            .post(endpoints::STAFF_LOGIN, credentials, messages::LOGIN_FAILED)
            .await?;
        info!(email = %credentials.email, "staff logged in");
        Ok(response)
    }

    /// Patient registration
    ///
    /// # Errors
    ///
    /// Returns the mapped request error, with the server's message when given
    pub async fn register(&self, registration: &Registration) -> BookingResult<Value> {
        let response = self
            .post(endpoints::REGISTER, registration, messages::REGISTER_FAILED)
            .await?;
        info!(email = %registration.email, "registered");
        Ok(response)
    }

    /// End the session and drop local cookies
    ///
    /// # Errors
    ///
    /// Returns the mapped request error; local cookies are kept in that case
    pub async fn logout(&self) -> BookingResult<()> {
        self.client
            .send(&ApiRequest::post(endpoints::LOGOUT))
            .await?
            .success_or(messages::LOGOUT_FAILED)?;
        self.client.clear_session();
        info!("logged out");
        Ok(())
    }

    /// Browser redirect URL that starts a social login with `provider`
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Config` if the URL cannot be built
    pub fn social_login_url(&self, provider: &str) -> BookingResult<Url> {
        let provider = provider.trim();
        if provider.is_empty() || !provider.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BookingError::config(
                "social_provider",
                format!("invalid provider '{provider}'"),
            ));
        }
        self.client
            .config()
            .endpoint(&format!("auth/{provider}/redirect"))
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &'static str,
        body: &T,
        fallback: &'static str,
    ) -> BookingResult<Value> {
        let request = ApiRequest::post(path).json(body)?;
        let response = self.client.send(&request).await?.success_or(fallback)?;
        if response.body().is_empty() {
            return Ok(Value::Null);
        }
        response.json(fallback)
    }
}
