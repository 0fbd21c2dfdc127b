// ABOUTME: Booking command for booking-cli
// ABOUTME: Drives the workflow step by step and prints the checkout URL
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use anyhow::{anyhow, Context, Result};
use booking_client::appointments::BookingService;
use booking_client::client::AuthenticatedClient;
use booking_client::workflow::BookingSession;
use booking_core::models::{
    PaymentMethod, Provider, ProviderId, ServiceId, Step, StepValue, TimeOfDay,
};
use chrono::NaiveDate;
use tracing::info;

use crate::helpers::display;

/// Choices for one booking
pub struct Order {
    /// Service to book
    pub service: ServiceId,
    /// Appointment date
    pub date: NaiveDate,
    /// Appointment time
    pub time: TimeOfDay,
    /// Dentist to book with
    pub dentist: ProviderId,
    /// Checkout payment method
    pub payment: PaymentMethod,
}

/// Walk the workflow to the summary and submit
pub async fn run(client: &AuthenticatedClient, order: &Order) -> Result<()> {
    let service = BookingService::new(client.clone())
        .list_services()
        .await?
        .into_iter()
        .find(|service| service.id == order.service)
        .ok_or_else(|| anyhow!("unknown service {}", order.service))?;

    let session = BookingSession::from_client(client);
    let choices = [
        StepValue::Service(service),
        StepValue::Date(order.date),
        StepValue::Time(order.time),
        StepValue::Provider(Provider::new(order.dentist, String::new())),
        StepValue::PaymentMethod(order.payment),
    ];

    for choice in choices {
        let step = choice.step();
        if let Some(error) = session.inspect(|workflow| {
            workflow
                .current_constraint()
                .and_then(|constraint| constraint.state.error().cloned())
        }) {
            return Err(error).with_context(|| format!("availability for {step} failed"));
        }
        session
            .select(choice)
            .with_context(|| format!("cannot select {step}"))?;
        let next = session.advance().await?;
        info!(from = %step, to = %next, "advanced");
    }

    display::summary(&session.snapshot());
    match session.submit().await {
        Ok(checkout) => {
            println!("Booking created. Continue to payment:");
            println!("{checkout}");
            Ok(())
        }
        Err(error) => {
            if session.step() == Step::Failed {
                session.acknowledge_failure()?;
            }
            Err(error).context("booking failed")
        }
    }
}
