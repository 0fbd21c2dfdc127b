// ABOUTME: Roles, session snapshots and the identity lookup payload
// ABOUTME: Maps each role to its landing route
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::routes;

/// Role attached to an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Patient
    User,
    /// Dentist
    Dentist,
    /// Administrator
    Admin,
}

impl Role {
    /// Every role
    pub const ALL: [Self; 3] = [Self::User, Self::Dentist, Self::Admin];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Dentist => "dentist",
            Self::Admin => "admin",
        }
    }

    /// Where this role lands after login
    #[must_use]
    pub const fn landing_route(self) -> &'static str {
        match self {
            Self::Admin => routes::ADMIN,
            Self::Dentist => routes::DENTIST,
            Self::User => routes::HOME,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "dentist" => Ok(Self::Dentist),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Snapshot of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    /// Whether the identity lookup succeeded
    pub authenticated: bool,
    /// Role, when known and recognised
    pub role: Option<Role>,
}

impl Session {
    /// No session
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            authenticated: false,
            role: None,
        }
    }

    /// Authenticated session with an optional role
    #[must_use]
    pub const fn authenticated(role: Option<Role>) -> Self {
        Self {
            authenticated: true,
            role,
        }
    }

    /// Landing route for this session
    #[must_use]
    pub fn landing_route(&self) -> &'static str {
        match (self.authenticated, self.role) {
            (false, _) => routes::LOGIN,
            (true, Some(role)) => role.landing_route(),
            (true, None) => routes::HOME,
        }
    }
}

/// Identity lookup response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Raw role label
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Recognised role; unknown labels map to `None`
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|raw| raw.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_and_landing() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Dentist.landing_route(), "/dentist");
        assert_eq!(Role::User.landing_route(), "/");
    }

    #[test]
    fn test_profile_with_unknown_role() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id": 4, "name": "Lea", "role": "receptionist"}"#).unwrap();
        assert_eq!(profile.role(), None);
        assert_eq!(Session::authenticated(profile.role()).landing_route(), "/");
        assert_eq!(Session::anonymous().landing_route(), "/auth");
    }
}
