// ABOUTME: Async driver running a booking workflow against the resolver, booking API and checkout
// ABOUTME: The machine lock is never held across an await; stale results are dropped on arrival
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use booking_core::models::{Fingerprint, Step, StepValue};
use booking_core::{BookingError, BookingResult};
use tracing::{debug, info};
use url::Url;

use super::machine::BookingWorkflow;
use crate::appointments::{BookingCreator, BookingService};
use crate::availability::{AvailabilityResolver, HttpAvailabilityResolver};
use crate::client::AuthenticatedClient;
use crate::payment::{HttpPaymentHandoff, PaymentHandoff};

/// A booking workflow wired to its collaborators
///
/// Clones share the same workflow, so a UI can hand one clone to each
/// control. Operations that issue a query await it and apply the result;
/// concurrent navigation meanwhile is allowed and makes the result stale.
#[derive(Clone)]
pub struct BookingSession {
    machine: Arc<Mutex<BookingWorkflow>>,
    resolver: Arc<dyn AvailabilityResolver>,
    bookings: Arc<dyn BookingCreator>,
    payments: Arc<dyn PaymentHandoff>,
}

impl BookingSession {
    /// Session with explicit collaborators
    #[must_use]
    pub fn new(
        resolver: Arc<dyn AvailabilityResolver>,
        bookings: Arc<dyn BookingCreator>,
        payments: Arc<dyn PaymentHandoff>,
    ) -> Self {
        Self {
            machine: Arc::new(Mutex::new(BookingWorkflow::new())),
            resolver,
            bookings,
            payments,
        }
    }

    /// Session talking to the booking API through `client`
    #[must_use]
    pub fn from_client(client: &AuthenticatedClient) -> Self {
        Self::new(
            Arc::new(HttpAvailabilityResolver::new(client.clone())),
            Arc::new(BookingService::new(client.clone())),
            Arc::new(HttpPaymentHandoff::new(client.clone())),
        )
    }

    /// Read the workflow
    pub fn inspect<T>(&self, view: impl FnOnce(&BookingWorkflow) -> T) -> T {
        view(&self.lock())
    }

    /// Copy of the workflow
    #[must_use]
    pub fn snapshot(&self) -> BookingWorkflow {
        self.inspect(BookingWorkflow::clone)
    }

    /// Current step
    #[must_use]
    pub fn step(&self) -> Step {
        self.inspect(BookingWorkflow::step)
    }

    /// Record the choice for the current step
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` if the choice is rejected
    pub fn select(&self, value: StepValue) -> BookingResult<()> {
        self.lock().select(value)?;
        Ok(())
    }

    /// Move to the next step, loading its availability
    ///
    /// A failed query is recorded on the step's constraint, not returned.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` if advancing is rejected
    pub async fn advance(&self) -> BookingResult<Step> {
        let query = self.lock().advance()?;
        self.settle(query).await;
        Ok(self.step())
    }

    /// Move to the previous step, reloading its availability when needed
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` if retreating is rejected
    pub async fn retreat(&self) -> BookingResult<Step> {
        let query = self.lock().retreat()?;
        self.settle(query).await;
        Ok(self.step())
    }

    /// Re-run the current step's availability query
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` if no query can be issued
    pub async fn retry_availability(&self) -> BookingResult<()> {
        let fingerprint = self.lock().retry_availability()?;
        self.settle(Some(fingerprint)).await;
        Ok(())
    }

    /// Submit the booking and open its checkout
    ///
    /// Returns the checkout URL the caller navigates to.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` away from `Summary`, the creation
    /// error (the workflow is then at `Failed`), or
    /// `BookingError::PaymentHandoff` when the booking exists but checkout
    /// could not start
    pub async fn submit(&self) -> BookingResult<Url> {
        let ticket = self.lock().begin_submit()?;
        let outcome = self.bookings.create_booking(&ticket.request).await;
        self.lock().complete_submit(outcome.clone())?;
        let confirmation = outcome?;

        let booking_id = confirmation.booking_id;
        let checkout = self
            .payments
            .initiate(booking_id, ticket.payment_method)
            .await
            .map_err(|error| BookingError::PaymentHandoff {
                booking_id,
                reason: error.to_string(),
            })?;
        info!(%booking_id, "booking submitted; handing off to checkout");
        Ok(checkout)
    }

    /// Return from `Failed` to `Summary`
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Workflow` when nothing failed
    pub fn acknowledge_failure(&self) -> BookingResult<()> {
        self.lock().acknowledge_failure()?;
        Ok(())
    }

    async fn settle(&self, query: Option<Fingerprint>) {
        let Some(fingerprint) = query else {
            return;
        };
        let result = self.resolver.resolve(&fingerprint).await;
        let applied = self.lock().apply_availability(fingerprint, result);
        if !applied {
            debug!(%fingerprint, "availability result superseded");
        }
    }

    fn lock(&self) -> MutexGuard<'_, BookingWorkflow> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
