// ABOUTME: Session probing and route admission policy
// ABOUTME: decide() maps a session and a route's allowed roles to admit or redirect
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Session guard
//!
//! Sessions are never cached: every check queries the identity endpoint
//! again. A failed lookup of any kind, including a network failure, reads as
//! "not authenticated". A successful lookup with a non-null body is a session
//! even when the body is not a well-formed profile.

use booking_core::constants::{endpoints, routes};
use booking_core::models::{Role, Session, UserProfile};
use booking_core::{BookingError, BookingResult};
use serde_json::Value;
use tracing::debug;

use crate::client::{ApiRequest, AuthenticatedClient};

/// Outcome of a route admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Show the route
    Admit,
    /// No session; go to the login page
    RedirectLogin,
    /// Session without a fitting role; go to the authenticated landing
    RedirectHome,
}

impl Admission {
    /// Redirect target, `None` when admitted
    #[must_use]
    pub const fn redirect_route(self) -> Option<&'static str> {
        match self {
            Self::Admit => None,
            Self::RedirectLogin => Some(routes::LOGIN),
            Self::RedirectHome => Some(routes::HOME),
        }
    }
}

/// Admission policy for a route open to `allowed` roles
///
/// An authenticated session without a recognised role is never admitted
/// and never sent to login.
#[must_use]
pub fn decide(session: &Session, allowed: &[Role]) -> Admission {
    if !session.authenticated {
        return Admission::RedirectLogin;
    }
    match session.role {
        Some(role) if allowed.contains(&role) => Admission::Admit,
        _ => Admission::RedirectHome,
    }
}

/// Recognised role in an identity payload
///
/// Only the `role` label is read, so an otherwise unexpected payload still
/// yields a role, and a missing or unknown label yields `None`.
#[must_use]
pub fn role_of(identity: &Value) -> Option<Role> {
    identity
        .get("role")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
}

/// Queries the identity endpoint and applies [`decide`]
#[derive(Debug, Clone)]
pub struct SessionGuard {
    client: AuthenticatedClient,
}

impl SessionGuard {
    /// Guard sharing `client`'s session
    #[must_use]
    pub const fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    /// Raw identity lookup
    ///
    /// Any non-null 2xx body is a session, whatever its shape. A body that is
    /// not JSON is kept as a string.
    ///
    /// # Errors
    ///
    /// Returns the request error for non-2xx answers; `Ok(None)` for a null
    /// or empty body
    pub async fn identity(&self) -> BookingResult<Option<Value>> {
        let response = self
            .client
            .send(&ApiRequest::get(endpoints::USER))
            .await?
            .success_or("identity lookup failed")?;
        let body = response.body();
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value = serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        Ok((!value.is_null()).then_some(value))
    }

    /// Typed identity lookup
    ///
    /// # Errors
    ///
    /// Returns the request error for non-2xx answers and
    /// `BookingError::Decode` when the body is not a profile; `Ok(None)` for
    /// a null body
    pub async fn profile(&self) -> BookingResult<Option<UserProfile>> {
        self.identity()
            .await?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| BookingError::decode("user profile", e))
            })
            .transpose()
    }

    /// Whether a session exists; any failure counts as "no"
    pub async fn is_authenticated(&self) -> bool {
        self.session().await.authenticated
    }

    /// Role of the current session; `None` when unauthenticated or unrecognised
    pub async fn role(&self) -> Option<Role> {
        self.session().await.role
    }

    /// Fresh session snapshot from a single lookup
    pub async fn session(&self) -> Session {
        match self.identity().await {
            Ok(Some(identity)) => Session::authenticated(role_of(&identity)),
            Ok(None) => Session::anonymous(),
            Err(error) => {
                debug!(%error, "identity lookup failed; treating as unauthenticated");
                Session::anonymous()
            }
        }
    }

    /// Admission for a route open to `allowed`
    pub async fn admit(&self, allowed: &[Role]) -> Admission {
        let session = self.session().await;
        let admission = decide(&session, allowed);
        debug!(
            authenticated = session.authenticated,
            role = ?session.role,
            ?admission,
            "route admission"
        );
        admission
    }

    /// Session for a route open to `allowed`, or the matching error
    ///
    /// # Errors
    ///
    /// Returns `BookingError::NotAuthenticated` without a session and
    /// `BookingError::PermissionDenied` for a role outside `allowed`
    pub async fn require(&self, allowed: &[Role]) -> BookingResult<Session> {
        let session = self.session().await;
        match decide(&session, allowed) {
            Admission::Admit => Ok(session),
            Admission::RedirectLogin => Err(BookingError::NotAuthenticated),
            Admission::RedirectHome => Err(BookingError::PermissionDenied),
        }
    }

    /// Where the current session lands after login
    pub async fn landing(&self) -> &'static str {
        self.session().await.landing_route()
    }
}
