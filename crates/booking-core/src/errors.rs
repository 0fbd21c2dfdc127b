// ABOUTME: Error types for the booking client with a user-facing error taxonomy
// ABOUTME: Defines BookingError, its ErrorKind classification, and rejected workflow transitions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Error Handling
//!
//! Every fallible operation in the client returns [`BookingResult`]. Errors
//! carry plain strings rather than foreign error sources so they can be
//! cloned into workflow state and replayed to every waiter of a shared
//! operation.

use std::fmt::Display;

use crate::constants::security::{FORBIDDEN_STATUS, TOKEN_EXPIRED_STATUS};
use crate::models::{BookingId, Step};

/// Result alias used across the booking client
pub type BookingResult<T> = Result<T, BookingError>;

/// Coarse classification that decides how a caller reacts to an error
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The chosen slot was rejected at submission; adjust and resubmit
    SlotUnavailable,
    /// The anti-forgery token is stale and the single replay did not help
    AuthExpired,
    /// No session; route to login
    NotAuthenticated,
    /// Session exists but the role does not fit; route to the landing page
    PermissionDenied,
    /// Network or server trouble; retry with state preserved
    Transient,
    /// Caller error: bad configuration or a rejected workflow transition
    Invalid,
}

/// Common error type for booking client operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// The selected slot is no longer bookable
    #[error("Slot unavailable: {message}")]
    SlotUnavailable {
        /// Server-provided explanation
        message: String,
    },

    /// Anti-forgery token rejected
    #[error("Anti-forgery token rejected with status {status}")]
    AuthExpired {
        /// HTTP status of the rejection (419 or 403)
        status: u16,
    },

    /// Request requires an authenticated session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Authenticated, but the role is not allowed here
    #[error("Permission denied")]
    PermissionDenied,

    /// Server answered with an unexpected status
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided or fallback message
        message: String,
    },

    /// Transport failure before any response arrived
    #[error("Network error: {reason}")]
    Network {
        /// Transport error description
        reason: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to decode {context}: {reason}")]
    Decode {
        /// What was being decoded
        context: &'static str,
        /// Decoder error description
        reason: String,
    },

    /// Invalid or missing configuration
    #[error("Configuration error for {key}: {reason}")]
    Config {
        /// Configuration key
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A workflow transition was rejected; the workflow state is unchanged
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Booking was created but the checkout session could not be opened
    #[error("Booking {booking_id} created but payment could not start: {reason}")]
    PaymentHandoff {
        /// Identifier of the created booking
        booking_id: BookingId,
        /// Why the checkout session failed
        reason: String,
    },
}

impl BookingError {
    /// Map an HTTP status and optional server message to an error
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => Self::NotAuthenticated,
            FORBIDDEN_STATUS | TOKEN_EXPIRED_STATUS => Self::AuthExpired { status },
            _ => Self::Server {
                status,
                message: message.into(),
            },
        }
    }

    /// Transport failure
    pub fn network(reason: impl Display) -> Self {
        Self::Network {
            reason: reason.to_string(),
        }
    }

    /// Response decoding failure
    pub fn decode(context: &'static str, reason: impl Display) -> Self {
        Self::Decode {
            context,
            reason: reason.to_string(),
        }
    }

    /// Configuration failure
    pub fn config(key: &'static str, reason: impl Display) -> Self {
        Self::Config {
            key,
            reason: reason.to_string(),
        }
    }

    /// Classify this error for routing and retry decisions
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SlotUnavailable { .. } => ErrorKind::SlotUnavailable,
            Self::AuthExpired { .. } => ErrorKind::AuthExpired,
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Server { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::PaymentHandoff { .. } => ErrorKind::Transient,
            Self::Config { .. } | Self::Workflow(_) => ErrorKind::Invalid,
        }
    }

    /// Whether offering the user a retry makes sense
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::SlotUnavailable | ErrorKind::AuthExpired | ErrorKind::Transient
        )
    }
}

/// Reasons a workflow operation was refused
///
/// A rejected operation never changes workflow state.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// `retreat()` at the first step
    #[error("Already at the first step")]
    NoPreviousStep,

    /// The current step has no selection yet
    #[error("Step {step} has no selection")]
    StepIncomplete {
        /// Current step
        step: Step,
    },

    /// Earlier steps are not all selected
    #[error("Step {step} requires all earlier selections")]
    PrerequisiteMissing {
        /// Step whose precondition is unmet
        step: Step,
    },

    /// Availability for the current step is still being fetched
    #[error("Availability for step {step} is still loading")]
    QueryPending {
        /// Current step
        step: Step,
    },

    /// Availability for the current step failed or was never fetched
    #[error("Availability for step {step} is not loaded")]
    ConstraintUnavailable {
        /// Current step
        step: Step,
    },

    /// The value is disallowed by the step's availability
    #[error("{value} is not available at step {step}")]
    ValueRejected {
        /// Current step
        step: Step,
        /// Rendered value
        value: String,
    },

    /// The value belongs to another step
    #[error("Expected a value for step {expected}, got one for step {actual}")]
    WrongStep {
        /// Current step
        expected: Step,
        /// Step the value belongs to
        actual: Step,
    },

    /// `advance()` from the summary; the booking must be submitted
    #[error("Summary must be confirmed with submit")]
    SubmitRequired,

    /// `submit()` away from the summary
    #[error("Submission is only possible from the summary, current step is {step}")]
    NotAtSummary {
        /// Current step
        step: Step,
    },

    /// A submission is outstanding
    #[error("A submission is already in flight")]
    SubmissionPending,

    /// A submission outcome arrived with no submission in flight
    #[error("No submission is in flight, current step is {step}")]
    NotSubmitting {
        /// Current step
        step: Step,
    },

    /// The failure must be acknowledged before anything else
    #[error("The failed submission must be acknowledged first")]
    AcknowledgeRequired,

    /// No failed submission to acknowledge
    #[error("There is no failed submission to acknowledge")]
    NothingToAcknowledge,

    /// The workflow instance already finished
    #[error("Workflow finished at step {step}")]
    Terminal {
        /// Final step
        step: Step,
    },
}
