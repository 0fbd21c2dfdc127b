// ABOUTME: Core types and constants for the appointment booking client
// ABOUTME: Foundation crate with error handling, booking models, and endpoint constants
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Booking Core
//!
//! Foundation crate providing shared types and constants for the booking
//! client. It has no I/O: everything here is plain data that the HTTP layer,
//! the workflow state machine and the session guard agree on.
//!
//! ## Modules
//!
//! - **errors**: `BookingError`, `ErrorKind` and `WorkflowError`
//! - **constants**: endpoint paths, cookie/header names, routes and env keys
//! - **models**: catalog, selection, availability, booking, session and payment types

/// Unified error handling with a user-facing error taxonomy
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (services, providers, selections, bookings, roles)
pub mod models;

pub use errors::{BookingError, BookingResult, ErrorKind, WorkflowError};
