// ABOUTME: Booking workflow steps, the partial selection, and selection-prefix fingerprints
// ABOUTME: Enforces that a field is only set once every earlier field is set
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::BookingRequest;
use super::catalog::{Provider, Service, ServiceId, TimeOfDay};
use super::payment::PaymentMethod;
use crate::errors::WorkflowError;

/// States of the booking workflow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Choose a service
    Service,
    /// Choose a date (gated by fully-booked dates)
    Date,
    /// Choose a time (gated by open slots)
    Time,
    /// Choose a provider (gated by available providers)
    Provider,
    /// Choose a payment method
    PaymentMethod,
    /// Review before submitting
    Summary,
    /// Booking creation in flight
    Submitting,
    /// Booking created
    Success,
    /// Booking rejected; acknowledge to return to the summary
    Failed,
}

impl Step {
    /// Steps that own a selection field, in order
    pub const SELECTION_STEPS: [Self; 5] = [
        Self::Service,
        Self::Date,
        Self::Time,
        Self::Provider,
        Self::PaymentMethod,
    ];

    /// Next step of the forward chain, up to `Submitting`
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Service => Some(Self::Date),
            Self::Date => Some(Self::Time),
            Self::Time => Some(Self::Provider),
            Self::Provider => Some(Self::PaymentMethod),
            Self::PaymentMethod => Some(Self::Summary),
            Self::Summary => Some(Self::Submitting),
            Self::Submitting | Self::Success | Self::Failed => None,
        }
    }

    /// Previous step for `retreat()`; `None` outside `Date..=Summary`
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Date => Some(Self::Service),
            Self::Time => Some(Self::Date),
            Self::Provider => Some(Self::Time),
            Self::PaymentMethod => Some(Self::Provider),
            Self::Summary => Some(Self::PaymentMethod),
            Self::Service | Self::Submitting | Self::Success | Self::Failed => None,
        }
    }

    /// Whether entering this step requires an availability query
    #[must_use]
    pub const fn is_constrained(self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Provider)
    }

    /// Position in [`Self::SELECTION_STEPS`]
    #[must_use]
    pub const fn position(self) -> Option<usize> {
        match self {
            Self::Service => Some(0),
            Self::Date => Some(1),
            Self::Time => Some(2),
            Self::Provider => Some(3),
            Self::PaymentMethod => Some(4),
            Self::Summary | Self::Submitting | Self::Success | Self::Failed => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Service => "service",
            Self::Date => "date",
            Self::Time => "time",
            Self::Provider => "provider",
            Self::PaymentMethod => "payment method",
            Self::Summary => "summary",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A choice for one selection step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValue {
    /// Service choice
    Service(Service),
    /// Date choice
    Date(NaiveDate),
    /// Time choice
    Time(TimeOfDay),
    /// Provider choice
    Provider(Provider),
    /// Payment method choice
    PaymentMethod(PaymentMethod),
}

impl StepValue {
    /// The step this value belongs to
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::Service(_) => Step::Service,
            Self::Date(_) => Step::Date,
            Self::Time(_) => Step::Time,
            Self::Provider(_) => Step::Provider,
            Self::PaymentMethod(_) => Step::PaymentMethod,
        }
    }
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(service) => write!(f, "service {} ({})", service.id, service.name),
            Self::Date(date) => write!(f, "date {date}"),
            Self::Time(time) => write!(f, "time {time}"),
            Self::Provider(provider) => write!(f, "provider {}", provider.id),
            Self::PaymentMethod(method) => write!(f, "payment method {method}"),
        }
    }
}

/// Identity of the selection prefix an availability query was issued for
///
/// Doubles as the query itself: each variant names exactly the inputs of
/// one resolver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Fully-booked dates for a service
    BookedDates {
        /// Selected service
        service: ServiceId,
    },
    /// Open slots for a service on a date
    OpenSlots {
        /// Selected service
        service: ServiceId,
        /// Selected date
        date: NaiveDate,
    },
    /// Providers for a service at a date and time
    Providers {
        /// Selected service
        service: ServiceId,
        /// Selected date
        date: NaiveDate,
        /// Selected time
        time: TimeOfDay,
    },
}

impl Fingerprint {
    /// Step whose constraint this query produces
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::BookedDates { .. } => Step::Date,
            Self::OpenSlots { .. } => Step::Time,
            Self::Providers { .. } => Step::Provider,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BookedDates { service } => write!(f, "booked-dates[{service}]"),
            Self::OpenSlots { service, date } => write!(f, "open-slots[{service}/{date}]"),
            Self::Providers {
                service,
                date,
                time,
            } => write!(f, "providers[{service}/{date}/{time}]"),
        }
    }
}

/// The choices made so far
///
/// Fields follow the order of [`Step::SELECTION_STEPS`]; a field can only be
/// set when every earlier field is set, and changing a field clears every
/// later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    service: Option<Service>,
    date: Option<NaiveDate>,
    time: Option<TimeOfDay>,
    provider: Option<Provider>,
    payment_method: Option<PaymentMethod>,
}

impl Selection {
    /// Selected service
    #[must_use]
    pub const fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// Selected date
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Selected time
    #[must_use]
    pub const fn time(&self) -> Option<TimeOfDay> {
        self.time
    }

    /// Selected provider
    #[must_use]
    pub const fn provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    /// Selected payment method
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Whether the field owned by `step` is set
    #[must_use]
    pub const fn is_set(&self, step: Step) -> bool {
        match step {
            Step::Service => self.service.is_some(),
            Step::Date => self.date.is_some(),
            Step::Time => self.time.is_some(),
            Step::Provider => self.provider.is_some(),
            Step::PaymentMethod => self.payment_method.is_some(),
            Step::Summary | Step::Submitting | Step::Success | Step::Failed => false,
        }
    }

    /// Whether every field before `step` is set
    ///
    /// Non-selection steps require the full selection.
    #[must_use]
    pub fn prefix_complete(&self, step: Step) -> bool {
        let end = step.position().unwrap_or(Step::SELECTION_STEPS.len());
        Step::SELECTION_STEPS[..end]
            .iter()
            .all(|earlier| self.is_set(*earlier))
    }

    /// Whether every field is set
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.prefix_complete(Step::Summary)
    }

    /// Current value of the field owned by `step`
    #[must_use]
    pub fn value(&self, step: Step) -> Option<StepValue> {
        match step {
            Step::Service => self.service.clone().map(StepValue::Service),
            Step::Date => self.date.map(StepValue::Date),
            Step::Time => self.time.map(StepValue::Time),
            Step::Provider => self.provider.clone().map(StepValue::Provider),
            Step::PaymentMethod => self.payment_method.map(StepValue::PaymentMethod),
            Step::Summary | Step::Submitting | Step::Success | Step::Failed => None,
        }
    }

    /// Record a choice
    ///
    /// Returns whether the field changed. A changed field clears every later
    /// field.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::PrerequisiteMissing` if an earlier field is unset.
    pub fn set(&mut self, value: StepValue) -> Result<bool, WorkflowError> {
        let step = value.step();
        if !self.prefix_complete(step) {
            return Err(WorkflowError::PrerequisiteMissing { step });
        }
        if self.value(step).as_ref() == Some(&value) {
            return Ok(false);
        }
        match value {
            StepValue::Service(service) => self.service = Some(service),
            StepValue::Date(date) => self.date = Some(date),
            StepValue::Time(time) => self.time = Some(time),
            StepValue::Provider(provider) => self.provider = Some(provider),
            StepValue::PaymentMethod(method) => self.payment_method = Some(method),
        }
        self.clear_after(step);
        Ok(true)
    }

    /// Clear every field after `step`
    pub fn clear_after(&mut self, step: Step) {
        let Some(position) = step.position() else {
            return;
        };
        if position < 1 {
            self.date = None;
        }
        if position < 2 {
            self.time = None;
        }
        if position < 3 {
            self.provider = None;
        }
        if position < 4 {
            self.payment_method = None;
        }
    }

    /// Fingerprint of the availability query gating `step`
    ///
    /// `None` for unconstrained steps or when the prefix is incomplete.
    #[must_use]
    pub fn fingerprint(&self, step: Step) -> Option<Fingerprint> {
        let service = self.service.as_ref()?.id;
        match step {
            Step::Date => Some(Fingerprint::BookedDates { service }),
            Step::Time => Some(Fingerprint::OpenSlots {
                service,
                date: self.date?,
            }),
            Step::Provider => Some(Fingerprint::Providers {
                service,
                date: self.date?,
                time: self.time?,
            }),
            _ => None,
        }
    }

    /// Booking creation payload; `None` until service, date, time and provider are set
    #[must_use]
    pub fn to_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            service_id: self.service.as_ref()?.id,
            provider_id: self.provider.as_ref()?.id,
            date: self.date?,
            time: self.time?,
        })
    }
}
