// ABOUTME: Booking workflow: step state machine, async result state and the async driver
// ABOUTME: The machine is pure; the driver performs the queries and submission it asks for
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Async driver wiring the machine to the resolver, booking API and checkout
pub mod driver;
/// The step state machine
pub mod machine;
/// Async result state and fingerprinted constraints
pub mod state;

pub use driver::BookingSession;
pub use machine::{BookingWorkflow, SubmissionTicket};
pub use state::{AsyncState, Constraint};
