// ABOUTME: Core data models shared by the client, the workflow and the session guard
// ABOUTME: Re-exports catalog, selection, availability, booking, session and payment types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Availability constraints returned by the resolver
pub mod availability;
/// Created bookings and booking lists
pub mod booking;
/// Services, providers, identifiers and times of day
pub mod catalog;
/// Checkout methods and payment return routes
pub mod payment;
/// Workflow steps, the selection and its fingerprints
pub mod selection;
/// Roles, sessions and the identity lookup payload
pub mod session;

pub use availability::Availability;
pub use booking::{Booking, BookingConfirmation, BookingPage, BookingRequest, Patient};
pub use catalog::{BookingId, Provider, ProviderId, Service, ServiceId, TimeOfDay};
pub use payment::{PaymentMethod, PaymentResult};
pub use selection::{Fingerprint, Selection, Step, StepValue};
pub use session::{Role, Session, UserProfile};
