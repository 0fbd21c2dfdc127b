// ABOUTME: Catalog types: services, providers, typed identifiers and times of day
// ABOUTME: Wire formats follow the backend: numeric ids, HH:MM times, YYYY-MM-DD dates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, ParseError, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a bookable service
    ServiceId
);
numeric_id!(
    /// Identifier of a provider (dentist)
    ProviderId
);
numeric_id!(
    /// Identifier of a created booking
    BookingId
);

/// A bookable service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier
    pub id: ServiceId,
    /// Display name
    pub name: String,
}

/// A provider that can take a booking
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Provider {
    /// Provider identifier
    pub id: ProviderId,
    /// First name, or full name when the backend sends only one field
    pub name: String,
    /// Optional middle name (booking lists only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Optional last name (booking lists only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Provider {
    /// Create a provider with a single name field
    #[must_use]
    pub fn new(id: impl Into<ProviderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            middle_name: None,
            last_name: None,
        }
    }

    /// All name parts joined with spaces
    #[must_use]
    pub fn display_name(&self) -> String {
        [
            Some(self.name.as_str()),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Wall-clock time of a slot, minute precision
///
/// Parses both `HH:MM` and `HH:MM:SS`; always renders as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from hour and minute
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Underlying chrono time
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Hour component
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute component
    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(|time| Self(time.with_second(0).unwrap_or(time)))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
