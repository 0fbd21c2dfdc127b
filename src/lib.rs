// ABOUTME: Main library entry point for the appointment booking client
// ABOUTME: Booking workflow, availability resolution, session guard and CSRF-aware HTTP client
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Booking Client
//!
//! Client core for reserving a time slot with a dentist against a backend
//! that protects every state-changing request with a rotating anti-forgery
//! token.
//!
//! ## Features
//!
//! - **Step workflow**: service, date, time, provider, payment method,
//!   summary, submission; each constrained step gated by fresh availability
//! - **Stale-result guard**: availability answers are tagged with the
//!   selection prefix that asked for them and dropped if it changed
//! - **Token recovery**: a stale token triggers exactly one shared refresh
//!   and one replay per rejected request
//! - **Session guard**: identity lookups plus a pure admission policy
//!
//! ## Architecture
//!
//! - **client**: cookie jar, single-flight guard and the authenticated client
//! - **availability**: the `AvailabilityResolver` trait and its HTTP version
//! - **workflow**: the synchronous state machine and its async driver
//! - **appointments**, **payment**, **accounts**: remaining API operations
//! - **`session_guard`**: authentication lookups and route admission
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use booking_client::client::AuthenticatedClient;
//! use booking_client::config::ClientConfig;
//! use booking_client::workflow::BookingSession;
//! use booking_core::BookingResult;
//!
//! #[tokio::main]
//! async fn main() -> BookingResult<()> {
//!     let client = AuthenticatedClient::new(ClientConfig::from_env()?)?;
//!     client.initialize().await?;
//!
//!     let session = BookingSession::from_client(&client);
//!     println!("workflow starts at step {}", session.step());
//!     Ok(())
//! }
//! ```

/// Session lifecycle: login, registration and logout
pub mod accounts;

/// Booking catalogue, creation and listing
pub mod appointments;

/// Availability queries for the constrained steps
pub mod availability;

/// HTTP client with anti-forgery token recovery
pub mod client;

/// Environment-only configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// Checkout handoff for created bookings
pub mod payment;

/// Session lookups and route admission
pub mod session_guard;

/// Booking workflow state machine and driver
pub mod workflow;

pub use booking_core::{BookingError, BookingResult, ErrorKind, WorkflowError};
