// ABOUTME: Tagged result state for async operations and fingerprinted step constraints
// ABOUTME: AsyncState is Idle, Loading, Ready(data) or Failed(error)
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use booking_core::models::{Availability, Fingerprint};
use booking_core::BookingError;

/// State of one async operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AsyncState<T> {
    /// Not started
    #[default]
    Idle,
    /// In flight
    Loading,
    /// Resolved successfully
    Ready(T),
    /// Resolved with an error
    Failed(BookingError),
}

impl<T> AsyncState<T> {
    /// Whether the operation is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Resolved value, if any
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Idle | Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Error, if the operation failed
    #[must_use]
    pub const fn error(&self) -> Option<&BookingError> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Idle | Self::Loading | Self::Ready(_) => None,
        }
    }
}

impl<T> From<Result<T, BookingError>> for AsyncState<T> {
    fn from(result: Result<T, BookingError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Availability for one step, tagged with the query that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Selection prefix the query was issued for
    pub fingerprint: Fingerprint,
    /// Query state
    pub state: AsyncState<Availability>,
}

impl Constraint {
    /// A freshly issued query
    #[must_use]
    pub const fn loading(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            state: AsyncState::Loading,
        }
    }

    /// Resolved availability, if any
    #[must_use]
    pub const fn availability(&self) -> Option<&Availability> {
        self.state.ready()
    }
}
